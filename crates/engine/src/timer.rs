//! Score timer - explicit cancellable tick task
//!
//! Counts ticks of [`TIMER_TICK_MS`] on a tokio task, starting from
//! [`TIMER_INITIAL_TICKS`]. `start` and `stop` must be called from within a
//! tokio runtime.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::types::{TIMER_INITIAL_TICKS, TIMER_TICK_MS};

#[derive(Debug)]
pub struct ScoreTimer {
    ticks: Arc<AtomicU32>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl ScoreTimer {
    pub fn new() -> Self {
        Self::with_period(Duration::from_millis(TIMER_TICK_MS))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            ticks: Arc::new(AtomicU32::new(0)),
            period,
            task: None,
        }
    }

    /// Reset to the initial tick count and start counting.
    ///
    /// Restarting a running timer replaces its task.
    pub fn start(&mut self) {
        self.stop();
        self.ticks.store(TIMER_INITIAL_TICKS, Ordering::Relaxed);

        let ticks = Arc::clone(&self.ticks);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                ticks.fetch_add(1, Ordering::Relaxed);
            }
        }));
        debug!(period_ms = self.period.as_millis() as u64, "score timer started");
    }

    /// Stop counting; the tick count is kept
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(ticks = self.ticks(), "score timer stopped");
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Default for ScoreTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScoreTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
