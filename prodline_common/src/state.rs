//! Production line state enumeration.
//!
//! Exactly one `MachineState` is current at any instant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating state of a production line.
///
/// `Error` is terminal for the worker loop: a fresh line has to be
/// constructed to resume production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineState {
    /// Not producing; ready to start.
    #[default]
    Idle,
    /// Worker loop active, cycles executing.
    Running,
    /// Fatal cycle fault. Worker loop has exited.
    Error,
    /// Scheduled maintenance pause.
    Maintenance,
}

impl MachineState {
    /// Upper-case name, identical to the serialized form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Error => "ERROR",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
