//! Scheduled collection: a timer that drives `Engine::collect` at a
//! configurable interval.
//!
//! Modeled as an explicit Stopped/Running state machine so reconfiguration
//! always cancels the old timer and arms exactly one new one. A collect that
//! is already running is never cancelled mid-flight; the loop just stops
//! waiting for it once the deadline passes.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::engine::Engine;

enum PollerState {
    Stopped,
    Running {
        handle: JoinHandle<()>,
        interval: Duration,
    },
}

pub struct Poller {
    engine: Arc<Engine>,
    deadline: Duration,
    state: Mutex<PollerState>,
}

impl Poller {
    /// `deadline` bounds how long one tick waits for a collect before moving
    /// on.
    pub fn new(engine: Arc<Engine>, deadline: Duration) -> Self {
        Poller {
            engine,
            deadline,
            state: Mutex::new(PollerState::Stopped),
        }
    }

    /// Arm the timer: one immediate collect, then one per `interval`.
    /// Starting an already-running poller re-arms it at the new interval.
    pub fn start(&self, interval: Duration) {
        let mut state = self.state.lock().unwrap();
        if let PollerState::Running { handle, .. } = &*state {
            handle.abort();
        }
        info!(interval_ms = interval.as_millis() as u64, "poller started");
        *state = PollerState::Running {
            handle: spawn_tick_loop(self.engine.clone(), interval, self.deadline),
            interval,
        };
    }

    /// Replace the timer interval, effective from the next tick. Cancels the
    /// old timer and arms exactly one new one. No-op while stopped.
    pub fn set_interval(&self, interval: Duration) {
        let mut state = self.state.lock().unwrap();
        match &*state {
            PollerState::Stopped => {
                debug!("set_interval ignored; poller is stopped");
            }
            PollerState::Running { handle, .. } => {
                handle.abort();
                info!(interval_ms = interval.as_millis() as u64, "poller interval changed");
                *state = PollerState::Running {
                    handle: spawn_tick_loop(self.engine.clone(), interval, self.deadline),
                    interval,
                };
            }
        }
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        if let PollerState::Running { handle, .. } = &*state {
            handle.abort();
            info!("poller stopped");
        }
        *state = PollerState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), PollerState::Running { .. })
    }

    /// Currently armed interval, if running.
    pub fn interval(&self) -> Option<Duration> {
        match &*self.state.lock().unwrap() {
            PollerState::Stopped => None,
            PollerState::Running { interval, .. } => Some(*interval),
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Ok(state) = self.state.lock()
            && let PollerState::Running { handle, .. } = &*state
        {
            handle.abort();
        }
    }
}

fn spawn_tick_loop(engine: Arc<Engine>, interval: Duration, deadline: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick.tick().await;

            let engine = engine.clone();
            let t0 = Instant::now();
            let result = tokio::time::timeout(
                deadline,
                tokio::task::spawn_blocking(move || engine.collect()),
            )
            .await;
            let elapsed = t0.elapsed();

            match result {
                Err(_) => {
                    warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        "collect exceeded deadline; not waiting for it"
                    );
                    continue;
                }
                Ok(Err(e)) => {
                    error!(error = %e, "collect panicked in spawn_blocking");
                    continue;
                }
                Ok(Ok(Err(e))) => {
                    // Next tick is the retry path for transient failures.
                    warn!(error = %e, "collect failed");
                    continue;
                }
                Ok(Ok(Ok(stats))) => {
                    debug!(
                        duration_ms = elapsed.as_millis() as u64,
                        timestamp = %stats.timestamp,
                        "collect completed"
                    );
                }
            }

            if elapsed > interval / 2 {
                warn!(
                    duration_ms = elapsed.as_millis() as u64,
                    interval_ms = interval.as_millis() as u64,
                    "collect exceeded 50% of interval"
                );
            }
        }
    })
}
