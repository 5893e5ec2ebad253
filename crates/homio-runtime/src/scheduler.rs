//! Periodic task scheduling

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a periodic task
///
/// Dropping the handle aborts the task, so holding it is what keeps the
/// schedule alive.
pub struct IntervalHandle {
    handle: JoinHandle<()>,
}

impl IntervalHandle {
    /// Stop the periodic task
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the task has stopped
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Invoke `callback` every `interval`
///
/// The first invocation happens one full interval after registration, not
/// immediately. Ticks missed while a callback runs long are delayed, not
/// bursted.
pub fn track_time_interval<F, Fut>(interval: Duration, mut callback: F) -> IntervalHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        // An interval's first tick completes immediately; consume it so the
        // first callback runs a full interval from now.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!(interval_ms = interval.as_millis() as u64, "Interval tick");
            callback().await;
        }
    });

    IntervalHandle { handle }
}
