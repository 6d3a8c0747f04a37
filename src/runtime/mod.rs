//! Async runtime helpers.
//!
//! Everything that suspends or spawns goes through this module so the rest of
//! the crate names one set of primitives. The bridge client is built on
//! reqwest, which requires tokio, so tokio is the only backend.

use std::future::Future;
use std::time::Duration;

mod tokio_impl;

pub use tokio_impl::JoinHandle;

/// Sleep for the specified duration.
pub async fn sleep(duration: Duration) {
    tokio_impl::sleep_impl(duration).await
}

/// Spawn a future as a background task.
///
/// Awaiting the handle yields `Err(TaskFailed)` instead of unwinding when the
/// task panicked, so one failed task cannot take down its caller.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio_impl::spawn_impl(future)
}

/// Error returned when a spawned task did not run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailed(pub String);

impl std::fmt::Display for TaskFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task failed: {}", self.0)
    }
}

impl std::error::Error for TaskFailed {}

/// A measurement of monotonically increasing time.
///
/// Backed by the runtime clock, so paused test time is honoured.
#[derive(Debug, Clone, Copy)]
pub struct Instant(tokio_impl::InstantInner);

impl Instant {
    /// Returns the current instant.
    pub fn now() -> Self {
        Instant(tokio_impl::InstantInner::now())
    }

    /// Returns the duration elapsed since this instant was created.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}
