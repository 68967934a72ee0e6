//! Observer capability.
//!
//! Visualization and logging collaborators implement [`Observer`] to receive
//! push notifications of state and metric changes. The production line
//! delivers notifications synchronously, in registration order, and isolates
//! each delivery: an `Err` return or a panic is logged and does not reach the
//! worker loop or the remaining observers.

use crate::metrics::MetricsSnapshot;
use crate::state::MachineState;
use thiserror::Error;

/// Error reported by an observer from [`Observer::update`].
#[derive(Debug, Error)]
pub enum ObserverError {
    /// I/O failure (e.g. persistence sink could not write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Observer refused the notification.
    #[error("Observer rejected update: {0}")]
    Rejected(String),
}

/// Receiver of production line notifications.
///
/// Implementations run on the notifying thread (the worker for cycle
/// notifications, the caller for start/stop), so they should return quickly.
pub trait Observer: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Handle one notification.
    fn update(&self, state: MachineState, metrics: &MetricsSnapshot) -> Result<(), ObserverError>;
}
