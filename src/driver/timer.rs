use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Owned periodic task
///
/// The task is aborted when the handle is cancelled or dropped, so every
/// exit path releases the timer. Cancelling twice is harmless.
pub struct TimerHandle {
    name: &'static str,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Run `on_tick` every `period`, first firing one period from now,
    /// until it returns `ControlFlow::Break`
    pub fn periodic<F, Fut>(name: &'static str, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            // Late ticks are dropped rather than replayed in a burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if on_tick().await.is_break() {
                    debug!("{} timer stopped itself", name);
                    break;
                }
            }
        });

        debug!("{} timer started ({:?})", name, period);
        Self {
            name,
            task: Some(task),
        }
    }

    /// True while the task has neither finished nor been cancelled
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("{} timer cancelled", self.name);
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
