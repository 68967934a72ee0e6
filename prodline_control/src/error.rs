//! Error types for the production line.
//!
//! Rejected commands go back to the caller. Cycle faults never reach the
//! caller: the worker loop translates them into the `Error` state.

use prodline_common::config::ConfigError;
use prodline_common::state::MachineState;
use std::fmt;
use thiserror::Error;

/// Control command issued by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ProductionLine::start`
    Start,
    /// `ProductionLine::stop`
    Stop,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}

/// Errors returned by the control surface.
#[derive(Debug, Error)]
pub enum LineError {
    /// Command not valid in the current state. State is unchanged; the
    /// caller may retry later.
    #[error("cannot {command}: line is {state}")]
    CommandRejected {
        /// Rejected command.
        command: Command,
        /// State at the time of the call.
        state: MachineState,
    },

    /// Line configuration failed validation at construction.
    #[error("invalid line configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Fatal production cycle fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleFault {
    /// Error count exceeded the fault threshold within one run.
    #[error("too many errors: {error_count} exceeds threshold {threshold}")]
    TooManyErrors {
        /// Error count after the faulting cycle.
        error_count: u32,
        /// Configured fault threshold.
        threshold: u32,
    },

    /// The cycle panicked. Counters may be partially updated.
    #[error("cycle panicked: {0}")]
    Panicked(String),
}
