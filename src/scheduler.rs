//! Fixed-cadence driver of the reconcile loop.

use std::time::Duration;

use log::{debug, warn};

use crate::bridge::Bridge;
use crate::history::{CycleHistory, EventType};
use crate::reconciler::{CycleReport, Reconciler};
use crate::runtime::{self, Instant};
use crate::store::Store;

/// Time to wait before the next cycle.
///
/// Floors at zero: a cycle that overran the interval is followed immediately.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hue_power_memory::sleep_duration;
///
/// let interval = Duration::from_millis(1500);
/// assert_eq!(sleep_duration(interval, Duration::from_millis(400)), Duration::from_millis(1100));
/// assert_eq!(sleep_duration(interval, Duration::from_secs(4)), Duration::ZERO);
/// ```
pub fn sleep_duration(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Owns the store and runs one cycle per interval, forever.
///
/// Cycles never overlap: the next one starts only after the previous one
/// (fetch, every per-light restore, merge) has finished.
#[derive(Debug)]
pub struct Scheduler<B> {
    reconciler: Reconciler<B>,
    interval: Duration,
    store: Store,
    history: CycleHistory,
}

impl<B: Bridge> Scheduler<B> {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

    pub fn new(reconciler: Reconciler<B>) -> Self {
        Scheduler {
            reconciler,
            interval: Self::DEFAULT_INTERVAL,
            store: Store::new(),
            history: CycleHistory::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn history(&self) -> &CycleHistory {
        &self.history
    }

    /// Run one cycle and return how long to sleep before the next.
    ///
    /// A failed cycle is logged and leaves the store as it was.
    pub async fn tick(&mut self) -> Duration {
        let start = Instant::now();
        self.history.record_cycle();

        match self.reconciler.run_cycle(&self.store).await {
            Ok(report) => {
                self.record(&report);
                self.store = report.store;
            }
            Err(e) => {
                warn!("cycle skipped: {e}");
                self.history.record(EventType::FetchFailed, None);
                self.history.record_error(&e.to_string());
            }
        }

        let elapsed = start.elapsed();
        let pause = sleep_duration(self.interval, elapsed);
        debug!("cycle took {elapsed:?}, next in {pause:?}");
        pause
    }

    /// Run cycles until the process is terminated.
    pub async fn run(mut self) {
        loop {
            let pause = self.tick().await;
            runtime::sleep(pause).await;
        }
    }

    fn record(&mut self, report: &CycleReport) {
        for id in &report.restored {
            self.history.record(EventType::Restored, Some(id));
        }
        for id in &report.retained {
            self.history.record(EventType::Unavailable, Some(id));
        }
        for id in &report.dropped {
            self.history.record(EventType::Dropped, Some(id));
        }
    }
}
