//! # Production Line Control Library
//!
//! A controllable production line that cycles between operating states,
//! advances synthetic production metrics on a timer, escalates transient
//! errors into a fault state and periodically suspends itself for
//! maintenance, while a background worker runs concurrently with the
//! start/stop control surface.
//!
//! # Module Structure
//!
//! - [`line`] - `ProductionLine` aggregate, control surface, worker loop
//! - [`state`] - State transition table
//! - [`cycle`] - One production cycle
//! - [`notify`] - Observer registration and isolated fan-out
//! - [`observers`] - Built-in logging and persistence observers
//! - [`error`] - Error types
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ProductionLine                            │
//! │  start/stop ──► ┌──────────────────────────┐                 │
//! │                 │ Mutex<LineCore>          │◄── worker thread│
//! │                 │ state · counters ·       │    (cycle loop) │
//! │                 │ history · observers      │                 │
//! │                 └────────────┬─────────────┘                 │
//! │                              │ snapshot (under lock)         │
//! │                              ▼                               │
//! │                   ObserverSet::notify_all (lock released)    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//!              TracingObserver · DataLogger · custom
//! ```

pub mod cycle;
pub mod error;
pub mod line;
pub mod notify;
pub mod observers;
pub mod state;

// Re-export key types for convenience
pub use crate::error::{Command, CycleFault, LineError};
pub use crate::line::ProductionLine;
pub use crate::observers::{DataLogger, TracingObserver};
