//! Timer port used for delayed health/readiness resets.

use std::time::Duration;

use tracing::warn;

/// One-shot work to run once a delay has elapsed.
pub type ResetTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules fire-and-forget tasks after a delay.
///
/// There is no cancellation: once scheduled, a task always runs.
pub trait ResetScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: ResetTask);
}

/// Scheduler backed by the ambient tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl ResetScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ResetTask) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task();
                });
            }
            Err(e) => warn!("No tokio runtime available, reset not scheduled: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        TokioScheduler.schedule(
            Duration::from_secs(2),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_schedule_outside_runtime_is_dropped() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        TokioScheduler.schedule(
            Duration::ZERO,
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert!(!fired.load(Ordering::SeqCst));
    }
}
