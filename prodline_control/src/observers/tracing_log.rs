//! Logging observer.

use prodline_common::metrics::MetricsSnapshot;
use prodline_common::observer::{Observer, ObserverError};
use prodline_common::state::MachineState;
use tracing::{debug, info};

/// Logs state changes at `info` and per-cycle metrics at `debug`.
#[derive(Debug, Default)]
pub struct TracingObserver {
    last_state: parking_lot::Mutex<Option<MachineState>>,
}

impl TracingObserver {
    /// Create a new logging observer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for TracingObserver {
    fn name(&self) -> &str {
        "tracing"
    }

    fn update(&self, state: MachineState, metrics: &MetricsSnapshot) -> Result<(), ObserverError> {
        let mut last = self.last_state.lock();
        if *last != Some(state) {
            info!(
                "Line {state}: rate={:.2}/min errors={} total={} uptime={:.1}s",
                metrics.production_rate, metrics.error_count, metrics.total_produced, metrics.uptime_s
            );
            *last = Some(state);
        } else {
            debug!(
                "Line {state}: rate={:.2}/min errors={} total={}",
                metrics.production_rate, metrics.error_count, metrics.total_produced
            );
        }
        Ok(())
    }
}
