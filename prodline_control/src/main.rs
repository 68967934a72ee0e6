//! # Production Line Simulator Binary
//!
//! Runs one production line for a fixed duration with the logging and
//! data-logging observers attached.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 30 s run, data appended to production_data.jsonl
//! prodline_control
//!
//! # Custom config, short run, reproducible cycles
//! prodline_control --config config/line.toml --duration 10 --seed 42
//!
//! # JSON logs, no data file
//! prodline_control --json --no-data-log -v
//!
//! # Also keep a plain-text log file
//! prodline_control --log-file production_line.log
//! ```

use clap::Parser;
use prodline_common::config::{self, AppConfig, LogLevel};
use prodline_common::state::MachineState;
use prodline_control::{DataLogger, ProductionLine, TracingObserver};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{Subscriber, error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// How often the main thread checks for Ctrl+C, fault or end of run.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Production line simulator
#[derive(Parser, Debug)]
#[command(name = "prodline_control")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Production line state machine simulator")]
#[command(long_about = None)]
struct Args {
    /// Path to line configuration (TOML). Defaults are used if absent or invalid.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run duration in seconds
    #[arg(short, long, default_value_t = 30)]
    duration: u64,

    /// JSONL file receiving one record per notification
    #[arg(long, value_name = "FILE", default_value = "production_data.jsonl")]
    data_file: PathBuf,

    /// Do not write the data file
    #[arg(long)]
    no_data_log: bool,

    /// Seed for reproducible cycles
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Also append plain-text logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        error!("Production line failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (app_config, config_error) = match &args.config {
        Some(path) => AppConfig::load_or_default(path),
        None => (AppConfig::default(), None),
    };
    let log_file = args
        .log_file
        .as_deref()
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .transpose();
    let (log_file, log_file_error) = match log_file {
        Ok(file) => (file, None),
        Err(e) => (None, Some(e)),
    };
    setup_tracing(&args, app_config.shared.log_level, log_file);

    if let Some(e) = log_file_error {
        warn!("Log file {:?} unusable ({e}), logging to stdout only", args.log_file);
    }
    match (&args.config, config_error) {
        (Some(path), None) => info!("Loaded configuration from {:?}", path),
        (Some(path), Some(e)) => warn!("Config {:?} unusable ({e}), using defaults", path),
        (None, _) => info!("No config file given, using defaults"),
    }
    info!(
        "{} v{} starting...",
        app_config.shared.service_name,
        env!("CARGO_PKG_VERSION")
    );

    let line_config = config::init_global(app_config.line);
    let line = match args.seed {
        Some(seed) => {
            info!("Using fixed seed {seed}");
            ProductionLine::with_seed(line_config, seed)?
        }
        None => ProductionLine::new(line_config)?,
    };

    line.register_observer(Arc::new(TracingObserver::new()));
    if !args.no_data_log {
        match DataLogger::open(&args.data_file) {
            Ok(logger) => line.register_observer(Arc::new(logger)),
            Err(e) => warn!("Data logging disabled: {e}"),
        }
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(true, Ordering::SeqCst);
    })?;

    line.start()?;

    let deadline = Instant::now() + Duration::from_secs(args.duration);
    while Instant::now() < deadline && !interrupted.load(Ordering::SeqCst) {
        if line.state() == MachineState::Error {
            warn!("Line entered Error state, ending run");
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    line.shutdown()?;

    let snapshot = line.snapshot();
    let history = line.history();
    info!("📊 Final line state: {}", line.state());
    info!("  - Cycles completed: {}", history.len());
    info!("  - Total produced: {}", snapshot.total_produced);
    info!("  - Error count: {}", snapshot.error_count);
    info!(
        "  - Average rate: {:.2} units/min",
        history.average_production_rate()
    );
    info!("  - Uptime: {:.1}s", snapshot.uptime_s);
    info!("Production line shutdown complete");
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and configured level.
///
/// Console output is text or JSON; `log_file`, when given, receives the
/// same events as plain text.
fn setup_tracing(args: &Args, configured: LogLevel, log_file: Option<File>) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        configured
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let file_layer = log_file.map(plain_text_layer);

    if args.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().with_thread_names(true))
            .init();
    }
}

/// Plain-text layer appending to `file`.
fn plain_text_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
}
