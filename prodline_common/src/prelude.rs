//! Prelude module for common re-exports.
//!
//! ```rust
//! use prodline_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{AppConfig, ConfigError, ConfigLoader, LineConfig, LogLevel, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::FAULT_THRESHOLD;

// ─── State & metrics ────────────────────────────────────────────────
pub use crate::metrics::{MetricsHistory, MetricsRecord, MetricsSnapshot};
pub use crate::state::MachineState;

// ─── Observers ──────────────────────────────────────────────────────
pub use crate::observer::{Observer, ObserverError};
