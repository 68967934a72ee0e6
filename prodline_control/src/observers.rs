//! Built-in observers.
//!
//! - [`TracingObserver`] - logs every notification through `tracing`
//! - [`DataLogger`] - appends one JSON record per notification to a file

pub mod data_logger;
pub mod tracing_log;

pub use data_logger::{DataLogger, DataRecord};
pub use tracing_log::TracingObserver;
