//! Configuration types, TOML loading and the process-wide instance.
//!
//! The production line receives its [`LineConfig`] by injection
//! (`Arc<LineConfig>`). Code that needs lazy global access uses
//! [`global`] / [`init_global`], which construct exactly one instance per
//! process even under concurrent first access.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "line-01"
//!
//! [line]
//! max_throughput = 120.0
//! error_threshold = 0.02
//! maintenance_interval_s = 1800.0
//! sensor_count = 6
//! cycle_interval_ms = 500
//! maintenance_duration_ms = 2000
//! ```

use crate::consts::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration block: logging and instance identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedConfig {
    /// Logging verbosity level.
    pub log_level: LogLevel,

    /// Line instance identifier.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Production line parameters. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineConfig {
    /// Upper bound on production rate (units per minute).
    pub max_throughput: f64,
    /// Probability in `[0, 1]` that a cycle is flagged erroneous.
    pub error_threshold: f64,
    /// Uptime after which maintenance is forced.
    pub maintenance_interval_s: f64,
    /// Number of line sensors. Informational only.
    pub sensor_count: u32,
    /// Pause between two production cycles.
    pub cycle_interval_ms: u64,
    /// Simulated maintenance duration.
    pub maintenance_duration_ms: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            max_throughput: DEFAULT_MAX_THROUGHPUT,
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            maintenance_interval_s: DEFAULT_MAINTENANCE_INTERVAL_S,
            sensor_count: DEFAULT_SENSOR_COUNT,
            cycle_interval_ms: DEFAULT_CYCLE_INTERVAL_MS,
            maintenance_duration_ms: DEFAULT_MAINTENANCE_DURATION_MS,
        }
    }
}

impl LineConfig {
    /// Validate numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `max_throughput` is not positive or exceeds [`MAX_THROUGHPUT_LIMIT`]
    /// - `error_threshold` is outside `[0, 1]`
    /// - `maintenance_interval_s` is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_throughput > 0.0 && self.max_throughput <= MAX_THROUGHPUT_LIMIT) {
            return Err(ConfigError::ValidationError(format!(
                "max_throughput must be within (0, {MAX_THROUGHPUT_LIMIT}], got {}",
                self.max_throughput
            )));
        }
        if !(0.0..=1.0).contains(&self.error_threshold) {
            return Err(ConfigError::ValidationError(format!(
                "error_threshold must be within [0, 1], got {}",
                self.error_threshold
            )));
        }
        if !self.maintenance_interval_s.is_finite() || self.maintenance_interval_s < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "maintenance_interval_s must be >= 0, got {}",
                self.maintenance_interval_s
            )));
        }
        Ok(())
    }

    /// Inter-cycle pause as `Duration`.
    #[inline]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    /// Maintenance pause as `Duration`.
    #[inline]
    pub fn maintenance_duration(&self) -> Duration {
        Duration::from_millis(self.maintenance_duration_ms)
    }
}

/// Top-level configuration document (`line.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging and identity.
    #[serde(default)]
    pub shared: SharedConfig,
    /// Line parameters.
    #[serde(default)]
    pub line: LineConfig,
}

impl AppConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.line.validate()
    }

    /// Load `path` and validate it.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate `path`; on any failure fall back to defaults.
    ///
    /// Configuration problems never abort startup. The failure is handed
    /// back next to the defaults so the caller can report it once logging
    /// is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::load_validated(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `serde::de::DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Process-wide instance ──────────────────────────────────────────

static GLOBAL_CONFIG: OnceLock<Arc<LineConfig>> = OnceLock::new();

/// Process-wide configuration, created with defaults on first access.
///
/// Every call returns the same instance.
pub fn global() -> Arc<LineConfig> {
    init_global_with(LineConfig::default)
}

/// Install `config` as the process-wide configuration.
///
/// Only the first installation (or first [`global`] access) wins; later
/// calls return the already installed instance unchanged.
pub fn init_global(config: LineConfig) -> Arc<LineConfig> {
    init_global_with(move || config)
}

fn init_global_with(make: impl FnOnce() -> LineConfig) -> Arc<LineConfig> {
    let mut created = false;
    let config = GLOBAL_CONFIG.get_or_init(|| {
        created = true;
        let config = make();
        info!(
            "Configuration loaded: max_throughput={}, error_threshold={}, maintenance_interval={}s, sensors={}",
            config.max_throughput,
            config.error_threshold,
            config.maintenance_interval_s,
            config.sensor_count
        );
        Arc::new(config)
    });
    if !created {
        debug!("Configuration already loaded, reusing instance");
    }
    Arc::clone(config)
}
