/*
 * Clock Module
 *
 * Fixed-period scheduling on dedicated threads and the rate counters behind
 * the FPS / TPS readouts.
 *
 * - PeriodicTask runs a closure every period until cancelled. A panic in one
 *   run is logged and the next run is still scheduled. Cancelling wakes the
 *   thread and joins it, so nothing runs after cancel() returns.
 * - RateCounter counts events and turns them into a per-second rate when
 *   recomputed. It is plain shared state handed out by Arc, not a global.
 * - SimulationClock ties the two together for the tick loop.
 */

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context;

/// Counts events between recomputations.
#[derive(Debug)]
pub struct RateCounter {
    events: AtomicU32,
    rate: AtomicU32,
    since: Mutex<Instant>,
}

impl Default for RateCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCounter {
    pub fn new() -> Self {
        Self {
            events: AtomicU32::new(0),
            rate: AtomicU32::new(0),
            since: Mutex::new(Instant::now()),
        }
    }

    pub fn record(&self) {
        self.events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn recompute(&self) -> u32 {
        self.recompute_at(Instant::now())
    }

    /// Turn the events counted since the previous recomputation into a rate
    /// and start a new window at `now`.
    pub fn recompute_at(&self, now: Instant) -> u32 {
        let mut since = self.since.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(*since).as_secs_f64();
        let events = self.events.swap(0, Ordering::Relaxed);

        let rate = if elapsed > 0.0 { (events as f64 / elapsed) as u32 } else { 0 };
        self.rate.store(rate, Ordering::Relaxed);
        *since = now;
        rate
    }

    /// Rate computed by the last recomputation.
    pub fn rate(&self) -> u32 {
        self.rate.load(Ordering::Relaxed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[derive(Debug, Default)]
struct TaskState {
    cancelled: AtomicBool,
    runs: AtomicU64,
    failures: AtomicU64,
}

/// A closure run on its own thread at a fixed rate.
#[derive(Debug)]
pub struct PeriodicTask {
    name: String,
    state: Arc<TaskState>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Start running `task` immediately and then every `period`. Runs that
    /// overrun the period are not made up for.
    pub fn spawn<F>(name: impl Into<String>, period: Duration, mut task: F) -> anyhow::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let name = name.into();
        let state = Arc::new(TaskState::default());

        let handle = {
            let task_name = name.clone();
            let state = Arc::clone(&state);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || {
                    let mut next = Instant::now();
                    while !state.cancelled.load(Ordering::Acquire) {
                        match panic::catch_unwind(AssertUnwindSafe(&mut task)) {
                            Ok(()) => {}
                            Err(payload) => {
                                state.failures.fetch_add(1, Ordering::Relaxed);
                                log::error!("{} panicked: {}", task_name, panic_message(payload.as_ref()));
                            }
                        }
                        state.runs.fetch_add(1, Ordering::Relaxed);

                        next += period;
                        let now = Instant::now();
                        if next <= now {
                            next = now;
                            continue;
                        }
                        while !state.cancelled.load(Ordering::Acquire) {
                            let now = Instant::now();
                            if now >= next {
                                break;
                            }
                            thread::park_timeout(next - now);
                        }
                    }
                    log::debug!("{} stopped", task_name);
                })
                .with_context(|| format!("failed to start {name} thread"))?
        };

        log::debug!("{} started with a period of {:?}", name, period);
        Ok(Self {
            name,
            state,
            handle: Some(handle),
        })
    }

    /// Completed runs, including the ones that panicked.
    pub fn runs(&self) -> u64 {
        self.state.runs.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.state.failures.load(Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Stop scheduling and wait for an in-flight run to finish.
    pub fn cancel(&mut self) {
        self.state.cancelled.store(true, Ordering::Release);

        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::error!("{} thread terminated abnormally", self.name);
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drives the simulation tick and measures how often it actually runs.
#[derive(Debug)]
pub struct SimulationClock {
    tick_task: PeriodicTask,
    rate_task: PeriodicTask,
    tick_rate: Arc<RateCounter>,
}

impl SimulationClock {
    pub fn start<F>(tick_interval: Duration, rate_window: Duration, mut tick: F) -> anyhow::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let tick_rate = Arc::new(RateCounter::new());

        let tick_task = {
            let tick_rate = Arc::clone(&tick_rate);
            PeriodicTask::spawn("simulation-tick", tick_interval, move || {
                tick();
                tick_rate.record();
            })?
        };

        let rate_task = {
            let tick_rate = Arc::clone(&tick_rate);
            PeriodicTask::spawn("tick-rate", rate_window, move || {
                tick_rate.recompute();
            })?
        };

        log::info!("simulation clock started, ticking every {:?}", tick_interval);
        Ok(Self {
            tick_task,
            rate_task,
            tick_rate,
        })
    }

    /// Measured ticks per second.
    pub fn ticks_per_second(&self) -> u32 {
        self.tick_rate.rate()
    }

    pub fn ticks(&self) -> u64 {
        self.tick_task.runs()
    }

    pub fn stop(mut self) {
        self.tick_task.cancel();
        self.rate_task.cancel();
        log::info!("simulation clock stopped after {} ticks", self.tick_task.runs());
    }
}
