//! Config loading and process-wide instance tests.
//!
//! The global instance is process-wide, so everything touching it lives in a
//! single test function of this binary.

use prodline_common::config::{self, AppConfig, ConfigError, LineConfig, LogLevel};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_global_config_single_instance_under_concurrent_access() {
    let handles: Vec<_> = (0..8).map(|_| thread::spawn(config::global)).collect();
    let instances: Vec<Arc<LineConfig>> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();

    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
    assert_eq!(*instances[0], LineConfig::default());

    // Already initialized: a later install does not replace the instance.
    let custom = LineConfig {
        max_throughput: 500.0,
        ..LineConfig::default()
    };
    let after = config::init_global(custom);
    assert!(Arc::ptr_eq(&instances[0], &after));
    assert_eq!(after.max_throughput, 100.0);
}

#[test]
fn test_load_or_default_reads_full_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.toml");
    fs::write(
        &path,
        r#"
[shared]
log_level = "debug"
service_name = "line-07"

[line]
max_throughput = 120.0
error_threshold = 0.1
maintenance_interval_s = 60.0
sensor_count = 8
cycle_interval_ms = 250
maintenance_duration_ms = 1000
"#,
    )
    .unwrap();

    let (config, error) = AppConfig::load_or_default(&path);
    assert!(error.is_none());
    assert_eq!(config.shared.log_level, LogLevel::Debug);
    assert_eq!(config.shared.service_name, "line-07");
    assert_eq!(config.line.max_throughput, 120.0);
    assert_eq!(config.line.error_threshold, 0.1);
    assert_eq!(config.line.maintenance_interval_s, 60.0);
    assert_eq!(config.line.sensor_count, 8);
    assert_eq!(config.line.cycle_interval_ms, 250);
    assert_eq!(config.line.maintenance_duration_ms, 1000);
}

#[test]
fn test_load_or_default_falls_back_on_missing_file() {
    let dir = TempDir::new().unwrap();
    let (config, error) = AppConfig::load_or_default(&dir.path().join("absent.toml"));
    assert!(matches!(error, Some(ConfigError::FileNotFound)));
    assert_eq!(config.line, LineConfig::default());
}

#[test]
fn test_load_or_default_falls_back_on_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.toml");
    fs::write(&path, "[line]\nerror_threshold = 2.0\n").unwrap();

    let (config, error) = AppConfig::load_or_default(&path);
    assert!(matches!(error, Some(ConfigError::ValidationError(_))));
    assert_eq!(config.line.error_threshold, 0.05);
}
