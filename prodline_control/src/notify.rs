//! Observer registration and isolated fan-out.
//!
//! The set lives inside the line aggregate, behind the line lock. A
//! notification clones the set together with the snapshot while the lock is
//! held and delivers after the lock is released, so registrations racing
//! with a notification pass never alter the sequence being iterated.

use prodline_common::metrics::MetricsSnapshot;
use prodline_common::observer::Observer;
use prodline_common::state::MachineState;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, warn};

/// Ordered collection of observers. Insertion order is notification order.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. Duplicates are allowed.
    pub fn register(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True if no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `update(state, metrics)` to every observer in order.
    ///
    /// Each delivery is isolated. An `Err` is logged as a warning and a
    /// caught panic as an error; the pass always reaches every observer.
    /// Returns the number of failed deliveries.
    pub fn notify_all(&self, state: MachineState, metrics: &MetricsSnapshot) -> usize {
        let mut failures = 0;
        for observer in &self.observers {
            let delivery =
                panic::catch_unwind(AssertUnwindSafe(|| observer.update(state, metrics)));
            match delivery {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    warn!("Observer {} failed: {e}", observer.name());
                }
                Err(payload) => {
                    failures += 1;
                    error!(
                        "Observer {} panicked: {}",
                        observer.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        failures
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|o| o.name()))
            .finish()
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
