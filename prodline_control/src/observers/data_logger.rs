//! Persistence sink: one JSON record per line.
//!
//! ```text
//! {"timestamp":"2025-01-01T12:00:00.000Z","state":"RUNNING","metrics":{"production_rate":91.3,...}}
//! ```
//!
//! A failed write is returned as `ObserverError`; the fan-out logs it and
//! the production loop carries on.

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use prodline_common::metrics::MetricsSnapshot;
use prodline_common::observer::{Observer, ObserverError};
use prodline_common::state::MachineState;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Record written for each notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Wall-clock time of the notification (RFC 3339).
    pub timestamp: String,
    /// Line state.
    pub state: MachineState,
    /// Metrics snapshot.
    pub metrics: MetricsSnapshot,
}

impl DataRecord {
    /// Build a record stamped with `at`.
    pub fn new(at: DateTime<Utc>, state: MachineState, metrics: MetricsSnapshot) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            state,
            metrics,
        }
    }
}

/// Append-only JSONL writer.
pub struct DataLogger {
    file: Mutex<File>,
}

impl DataLogger {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    /// Returns `ObserverError::Io` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ObserverError> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!("Logging production data to {:?}", path);
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Observer for DataLogger {
    fn name(&self) -> &str {
        "data_logger"
    }

    fn update(&self, state: MachineState, metrics: &MetricsSnapshot) -> Result<(), ObserverError> {
        let record = DataRecord::new(Utc::now(), state, *metrics);
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        let mut file = self.file.lock();
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
