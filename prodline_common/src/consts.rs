//! Defaults and fixed limits of the production line.

/// Number of error cycles tolerated within one run. Exceeding it is fatal.
pub const FAULT_THRESHOLD: u32 = 5;

/// Default upper bound on production rate (units per minute).
pub const DEFAULT_MAX_THROUGHPUT: f64 = 100.0;

/// Largest accepted `max_throughput` (units per minute).
pub const MAX_THROUGHPUT_LIMIT: f64 = 1.0e9;

/// Default probability that a cycle is flagged erroneous.
pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.05;

/// Default uptime between forced maintenance pauses (1 hour).
pub const DEFAULT_MAINTENANCE_INTERVAL_S: f64 = 3600.0;

/// Default number of line sensors (informational).
pub const DEFAULT_SENSOR_COUNT: u32 = 4;

/// Default pause between two production cycles.
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 1000;

/// Default simulated maintenance duration.
pub const DEFAULT_MAINTENANCE_DURATION_MS: u64 = 5000;

/// Lower bound of the per-cycle rate factor applied to `max_throughput`.
pub const RATE_FACTOR_MIN: f64 = 0.8;

/// Upper bound of the per-cycle rate factor applied to `max_throughput`.
pub const RATE_FACTOR_MAX: f64 = 1.0;

/// Rates are per minute; each cycle contributes one second worth of output.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Default service name reported in logs.
pub const DEFAULT_SERVICE_NAME: &str = "production_line";
