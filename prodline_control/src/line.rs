//! `ProductionLine` aggregate and its worker loop.
//!
//! All mutable state (machine state, counters, history, observers, RNG,
//! run generation) sits in one [`LineCore`] behind a single
//! `parking_lot::Mutex`. Two actors touch it: the caller of the control
//! surface and the worker thread of the current run.
//!
//! ## Worker loop
//!
//! ```text
//! ┌─► check run generation (under lock) ── stale ──► exit
//! │        │
//! │   production cycle ── fault ──► record, Error, notify, exit
//! │        │
//! │   uptime, maintenance if due
//! │        │
//! │   append history, notify observers
//! │        │
//! └── pause cycle_interval (condvar, woken by stop)
//! ```
//!
//! `stop()` only signals; the worker notices at its next lock acquisition,
//! at the latest one cycle interval later and immediately if it is pausing.
//! Every `start()` opens a new run generation, and only the worker of the
//! current generation may mutate the aggregate, so at most one worker is
//! ever active.

use parking_lot::{Condvar, Mutex, MutexGuard};
use prodline_common::config::LineConfig;
use prodline_common::metrics::{MetricsHistory, MetricsSnapshot};
use prodline_common::observer::Observer;
use prodline_common::state::MachineState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::cycle::ProductionCounters;
use crate::error::{Command, LineError};
use crate::notify::ObserverSet;
use crate::state::machine::{LineEvent, LineStateMachine, TransitionResult};

/// Mutable aggregate guarded by the line lock.
struct LineCore {
    machine: LineStateMachine,
    counters: ProductionCounters,
    uptime_s: f64,
    last_maintenance_s: f64,
    running: bool,
    generation: u64,
    history: MetricsHistory,
    observers: ObserverSet,
    rng: StdRng,
}

impl LineCore {
    /// True if the worker of `generation` may keep cycling.
    #[inline]
    fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    fn snapshot(&self) -> MetricsSnapshot {
        self.counters.snapshot(self.uptime_s)
    }

    /// State, snapshot and observer list captured together.
    fn notification(&self) -> Notification {
        Notification {
            state: self.machine.state(),
            metrics: self.snapshot(),
            observers: self.observers.clone(),
        }
    }
}

/// Consistent notification payload, delivered after the lock is released.
struct Notification {
    state: MachineState,
    metrics: MetricsSnapshot,
    observers: ObserverSet,
}

impl Notification {
    fn deliver(self) {
        self.observers.notify_all(self.state, &self.metrics);
    }
}

/// State shared between the control surface and the worker.
struct Shared {
    config: Arc<LineConfig>,
    core: Mutex<LineCore>,
    wake: Condvar,
    started_at: Instant,
}

impl Shared {
    fn elapsed_s(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Pause for `duration` with the lock released. Returns the reacquired
    /// guard, or `None` once the worker of `generation` has been superseded.
    fn pause<'a>(
        &'a self,
        mut core: MutexGuard<'a, LineCore>,
        duration: Duration,
        generation: u64,
        resume_when_stopped: bool,
    ) -> Option<MutexGuard<'a, LineCore>> {
        let deadline = Instant::now() + duration;
        loop {
            let live = if resume_when_stopped {
                core.generation == generation
            } else {
                core.is_current(generation)
            };
            if !live {
                return None;
            }
            if self.wake.wait_until(&mut core, deadline).timed_out() {
                return Some(core);
            }
        }
    }
}

/// Production line: state machine, worker loop and observer fan-out.
///
/// # Example
///
/// ```rust,no_run
/// use prodline_common::config::LineConfig;
/// use prodline_control::ProductionLine;
/// use std::sync::Arc;
///
/// let line = ProductionLine::new(Arc::new(LineConfig::default())).expect("valid config");
/// line.start().expect("line is idle");
/// std::thread::sleep(std::time::Duration::from_secs(3));
/// line.stop().expect("line is running");
/// ```
pub struct ProductionLine {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ProductionLine {
    /// Create an Idle line with an entropy-seeded RNG.
    ///
    /// # Errors
    /// `LineError::InvalidConfig` if `config` fails validation.
    pub fn new(config: Arc<LineConfig>) -> Result<Self, LineError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an Idle line whose cycles are reproducible for `seed`.
    ///
    /// # Errors
    /// `LineError::InvalidConfig` if `config` fails validation.
    pub fn with_seed(config: Arc<LineConfig>, seed: u64) -> Result<Self, LineError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create an Idle line using the process-wide configuration.
    ///
    /// # Errors
    /// `LineError::InvalidConfig` if the installed configuration is invalid.
    pub fn with_global_config() -> Result<Self, LineError> {
        Self::new(prodline_common::config::global())
    }

    fn with_rng(config: Arc<LineConfig>, rng: StdRng) -> Result<Self, LineError> {
        config.validate()?;
        info!(
            "Production line created (max_throughput={}, sensors={}, cycle={}ms)",
            config.max_throughput, config.sensor_count, config.cycle_interval_ms
        );
        let core = LineCore {
            machine: LineStateMachine::new(),
            counters: ProductionCounters::default(),
            uptime_s: 0.0,
            last_maintenance_s: 0.0,
            running: false,
            generation: 0,
            history: MetricsHistory::new(),
            observers: ObserverSet::new(),
            rng,
        };
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                core: Mutex::new(core),
                wake: Condvar::new(),
                started_at: Instant::now(),
            }),
            worker: Mutex::new(None),
        })
    }

    /// Configuration this line was built with.
    pub fn config(&self) -> &LineConfig {
        &self.shared.config
    }

    /// Register an observer. Notification order is registration order.
    pub fn register_observer(&self, observer: Arc<dyn Observer>) {
        let name = observer.name().to_string();
        self.shared.core.lock().observers.register(observer);
        info!("Registered observer: {name}");
    }

    /// Idle → Running, then spawn the worker. Returns without waiting for it.
    ///
    /// # Errors
    /// `LineError::CommandRejected` if the line is not Idle (no effect).
    /// `LineError::Spawn` if the worker thread cannot be created; the line
    /// is returned to Idle in that case.
    pub fn start(&self) -> Result<(), LineError> {
        let (generation, notification) = {
            let mut core = self.shared.core.lock();
            if let TransitionResult::Rejected(reason) = core.machine.handle_event(LineEvent::Start) {
                let state = core.machine.state();
                warn!("Cannot start: {reason}");
                return Err(LineError::CommandRejected {
                    command: Command::Start,
                    state,
                });
            }
            core.running = true;
            core.generation += 1;
            core.uptime_s = self.shared.elapsed_s();
            info!("Production line started (run {})", core.generation);
            (core.generation, core.notification())
        };
        notification.deliver();

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("prodline-worker-{generation}"))
            .spawn(move || run_worker(shared, generation));

        match spawned {
            Ok(handle) => {
                // A superseded worker exits on its own; its handle is detached.
                *self.worker.lock() = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("Failed to spawn worker: {e}");
                let notification = {
                    let mut core = self.shared.core.lock();
                    core.running = false;
                    core.machine.handle_event(LineEvent::Stop);
                    core.notification()
                };
                notification.deliver();
                Err(LineError::Spawn(e))
            }
        }
    }

    /// Running → Idle. Signals the worker and returns without waiting.
    ///
    /// # Errors
    /// `LineError::CommandRejected` if the line is not Running (no effect).
    pub fn stop(&self) -> Result<(), LineError> {
        let notification = {
            let mut core = self.shared.core.lock();
            if let TransitionResult::Rejected(reason) = core.machine.handle_event(LineEvent::Stop) {
                let state = core.machine.state();
                warn!("Cannot stop: {reason}");
                return Err(LineError::CommandRejected {
                    command: Command::Stop,
                    state,
                });
            }
            core.running = false;
            core.uptime_s = self.shared.elapsed_s();
            info!("Production line stopped");
            core.notification()
        };
        self.shared.wake.notify_all();
        notification.deliver();
        Ok(())
    }

    /// Terminate the current worker regardless of state and wait for it.
    ///
    /// A Running line is stopped as by [`stop`](Self::stop). A line in
    /// Maintenance has its pause cut short and stays in Maintenance.
    ///
    /// # Errors
    /// `LineError::WorkerPanicked` if the worker thread panicked.
    pub fn shutdown(&self) -> Result<(), LineError> {
        let notification = {
            let mut core = self.shared.core.lock();
            core.running = false;
            core.generation += 1;
            let stopped = core.machine.handle_event(LineEvent::Stop).is_ok();
            info!("Shutdown requested (state={})", core.machine.state());
            stopped.then(|| core.notification())
        };
        self.shared.wake.notify_all();
        if let Some(notification) = notification {
            notification.deliver();
        }
        self.join()
    }

    /// Wait for the current worker thread, if any, to exit.
    ///
    /// # Errors
    /// `LineError::WorkerPanicked` if the worker thread panicked.
    pub fn join(&self) -> Result<(), LineError> {
        let handle = self.worker.lock().take();
        match handle {
            Some(handle) => handle.join().map_err(|_| LineError::WorkerPanicked),
            None => Ok(()),
        }
    }

    /// Current state.
    pub fn state(&self) -> MachineState {
        self.shared.core.lock().machine.state()
    }

    /// Consistent copy of the current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.shared.core.lock().snapshot()
    }

    /// Copy of the metrics history.
    pub fn history(&self) -> MetricsHistory {
        self.shared.core.lock().history.clone()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.core.lock().observers.len()
    }
}

impl Drop for ProductionLine {
    fn drop(&mut self) {
        let mut core = self.shared.core.lock();
        core.running = false;
        core.generation += 1;
        drop(core);
        self.shared.wake.notify_all();
    }
}

/// Worker body for run `generation`.
fn run_worker(shared: Arc<Shared>, generation: u64) {
    debug!("Worker for run {generation} started");
    let config = Arc::clone(&shared.config);

    loop {
        let mut core = shared.core.lock();
        if !core.is_current(generation) {
            break;
        }

        // 1. Production cycle. A panic inside it is a fault like any other.
        let inner = &mut *core;
        let result = inner.counters.execute_isolated(&config, &mut inner.rng);

        // 2. Uptime.
        core.uptime_s = shared.elapsed_s();

        if let Err(fault) = result {
            let now = shared.elapsed_s();
            let snapshot = core.snapshot();
            core.history.push(now, &snapshot);
            core.machine.handle_event(LineEvent::CycleFault);
            core.running = false;
            error!("Production fault: {fault}");
            let notification = core.notification();
            drop(core);
            notification.deliver();
            break;
        }

        // 3. Maintenance.
        if core.uptime_s - core.last_maintenance_s >= config.maintenance_interval_s {
            match run_maintenance(&shared, core, generation) {
                Some(guard) if guard.generation == generation && guard.machine.allows_production() => {
                    core = guard
                }
                _ => break,
            }
        }

        // 4. History.
        let now = shared.elapsed_s();
        let snapshot = core.snapshot();
        let record = core.history.push(now, &snapshot);
        debug!(
            "Cycle {}: rate={:.2} errors={} total={}",
            record.cycle, record.production_rate, record.error_count, record.total_produced
        );

        // 5. Notify.
        let notification = core.notification();
        drop(core);
        notification.deliver();

        // 6. Pause.
        let core = shared.core.lock();
        if shared
            .pause(core, config.cycle_interval(), generation, false)
            .is_none()
        {
            break;
        }
    }

    debug!("Worker for run {generation} exited");
}

/// Running → Maintenance → Running. Returns the reacquired guard, or `None`
/// if the worker was superseded during the pause.
fn run_maintenance<'a>(
    shared: &'a Shared,
    mut core: MutexGuard<'a, LineCore>,
    generation: u64,
) -> Option<MutexGuard<'a, LineCore>> {
    if !core.machine.handle_event(LineEvent::MaintenanceDue).is_ok() {
        return Some(core);
    }
    info!("Starting maintenance (uptime={:.1}s)", core.uptime_s);
    let notification = core.notification();
    drop(core);
    notification.deliver();

    let core = shared.core.lock();
    let mut core = shared.pause(core, shared.config.maintenance_duration(), generation, true)?;

    core.counters.reset_errors();
    core.machine.handle_event(LineEvent::MaintenanceComplete);
    core.uptime_s = shared.elapsed_s();
    core.last_maintenance_s = core.uptime_s;
    info!("Maintenance completed");
    let notification = core.notification();
    drop(core);
    notification.deliver();

    Some(shared.core.lock())
}
