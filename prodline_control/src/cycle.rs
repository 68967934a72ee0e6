//! One production cycle: error draw → rate → output.
//!
//! The error check runs before the rate computation, so an error cycle
//! yields no output. Called by the worker while it holds the line lock.

use prodline_common::config::LineConfig;
use prodline_common::consts::{
    FAULT_THRESHOLD, RATE_FACTOR_MAX, RATE_FACTOR_MIN, SECONDS_PER_MINUTE,
};
use prodline_common::metrics::MetricsSnapshot;
use rand::Rng;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::error::CycleFault;
use crate::notify::panic_message;

/// Outcome of a non-fatal cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Normal cycle.
    Produced {
        /// Rate drawn for this cycle (units/minute).
        rate: f64,
        /// Units added to `total_produced`.
        units: u64,
    },
    /// Transient error, production continues.
    Errored {
        /// Error count after this cycle.
        error_count: u32,
    },
}

/// Counters advanced by the production cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionCounters {
    /// Most recent cycle's rate.
    pub production_rate: f64,
    /// Error cycles since last maintenance.
    pub error_count: u32,
    /// Cumulative output.
    pub total_produced: u64,
}

impl ProductionCounters {
    /// Execute one cycle.
    ///
    /// # Errors
    /// Returns `CycleFault::TooManyErrors` once `error_count` exceeds
    /// [`FAULT_THRESHOLD`]. Counters are already updated for the faulting
    /// cycle when the error is returned.
    pub fn execute<R: Rng>(
        &mut self,
        config: &LineConfig,
        rng: &mut R,
    ) -> Result<CycleOutcome, CycleFault> {
        if rng.gen_bool(config.error_threshold) {
            self.error_count += 1;
            self.production_rate = 0.0;
            warn!("Production error detected (error_count={})", self.error_count);
            if self.error_count > FAULT_THRESHOLD {
                return Err(CycleFault::TooManyErrors {
                    error_count: self.error_count,
                    threshold: FAULT_THRESHOLD,
                });
            }
            return Ok(CycleOutcome::Errored {
                error_count: self.error_count,
            });
        }

        let rate = rng.gen_range(RATE_FACTOR_MIN..=RATE_FACTOR_MAX) * config.max_throughput;
        let units = (rate / SECONDS_PER_MINUTE).floor() as u64;
        self.production_rate = rate;
        self.total_produced = self.total_produced.saturating_add(units);
        debug!("Cycle produced {units} units at {rate:.2}/min");
        Ok(CycleOutcome::Produced { rate, units })
    }

    /// [`execute`](Self::execute) with a panic reported as
    /// [`CycleFault::Panicked`] instead of unwinding into the worker.
    pub fn execute_isolated<R: Rng>(
        &mut self,
        config: &LineConfig,
        rng: &mut R,
    ) -> Result<CycleOutcome, CycleFault> {
        panic::catch_unwind(AssertUnwindSafe(|| self.execute(config, rng))).unwrap_or_else(
            |payload| Err(CycleFault::Panicked(panic_message(payload.as_ref()).to_string())),
        )
    }

    /// End of maintenance.
    #[inline]
    pub fn reset_errors(&mut self) {
        self.error_count = 0;
    }

    /// Snapshot with the given uptime.
    pub fn snapshot(&self, uptime_s: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            production_rate: self.production_rate,
            error_count: self.error_count,
            total_produced: self.total_produced,
            uptime_s,
        }
    }
}
