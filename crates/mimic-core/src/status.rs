//! Health and readiness state with timed auto-recovery.
//!
//! Each flag is an independent atomic. Readers may observe a combination of
//! (healthy, ready) that was never set together; gating only ever needs one
//! flag at a time, so no lock spans both.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::ports::{ResetScheduler, TokioScheduler};

/// Which flag an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    Health,
    Ready,
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Health => write!(f, "health"),
            Self::Ready => write!(f, "readiness"),
        }
    }
}

/// Why a gated endpoint refused to serve.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Unavailable {
    #[error("application is not ready")]
    NotReady,

    #[error("application is not healthy")]
    NotHealthy,
}

/// Mutable health/readiness flags shared by every request handler.
pub struct StatusState {
    healthy: Arc<AtomicBool>,
    ready: Arc<AtomicBool>,
    scheduler: Arc<dyn ResetScheduler>,
}

impl StatusState {
    /// Create the state with the tokio-backed reset scheduler.
    pub fn new(initial_health: bool, initial_readiness: bool) -> Self {
        Self::with_scheduler(initial_health, initial_readiness, Arc::new(TokioScheduler))
    }

    /// Create the state with a custom reset scheduler.
    pub fn with_scheduler(
        initial_health: bool,
        initial_readiness: bool,
        scheduler: Arc<dyn ResetScheduler>,
    ) -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(initial_health)),
            ready: Arc::new(AtomicBool::new(initial_readiness)),
            scheduler,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.set(StatusFlag::Health, healthy);
    }

    pub fn set_ready(&self, ready: bool) {
        self.set(StatusFlag::Ready, ready);
    }

    /// Read a flag.
    pub fn get(&self, flag: StatusFlag) -> bool {
        self.cell(flag).load(Ordering::SeqCst)
    }

    /// Overwrite a flag.
    pub fn set(&self, flag: StatusFlag, value: bool) {
        let previous = self.cell(flag).swap(value, Ordering::SeqCst);
        if previous != value {
            info!(flag = %flag, value, "Status changed");
        }
    }

    /// Mark `flag` bad, optionally restoring it after `reset_after`.
    ///
    /// The restore unconditionally writes `true` when it fires, whatever the
    /// flag holds at that moment. Earlier timers are not cancelled, so two
    /// degrades with different delays each fire their own restore.
    pub fn degrade(&self, flag: StatusFlag, reset_after: Option<Duration>) {
        self.set(flag, false);

        let Some(delay) = reset_after.filter(|d| !d.is_zero()) else {
            return;
        };

        info!(flag = %flag, delay_secs = delay.as_secs_f64(), "Scheduling status reset");
        let cell = Arc::clone(self.cell(flag));
        self.scheduler.schedule(
            delay,
            Box::new(move || {
                cell.store(true, Ordering::SeqCst);
                info!(flag = %flag, "Status reset fired");
            }),
        );
    }

    /// Gate for endpoints that only serve when the service is up.
    ///
    /// Readiness is checked before health.
    pub fn ensure_available(&self) -> Result<(), Unavailable> {
        if !self.is_ready() {
            return Err(Unavailable::NotReady);
        }
        if !self.is_healthy() {
            return Err(Unavailable::NotHealthy);
        }
        Ok(())
    }

    fn cell(&self, flag: StatusFlag) -> &Arc<AtomicBool> {
        match flag {
            StatusFlag::Health => &self.healthy,
            StatusFlag::Ready => &self.ready,
        }
    }
}

impl fmt::Debug for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusState")
            .field("healthy", &self.is_healthy())
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::ports::ResetTask;

    /// Captures scheduled tasks so tests decide when they fire.
    #[derive(Default)]
    struct ManualScheduler {
        pending: Mutex<Vec<(Duration, ResetTask)>>,
    }

    impl ManualScheduler {
        fn delays(&self) -> Vec<Duration> {
            self.pending.lock().unwrap().iter().map(|(d, _)| *d).collect()
        }

        fn fire_all(&self) {
            let tasks: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
            for (_, task) in tasks {
                task();
            }
        }
    }

    impl ResetScheduler for ManualScheduler {
        fn schedule(&self, delay: Duration, task: ResetTask) {
            self.pending.lock().unwrap().push((delay, task));
        }
    }

    #[test]
    fn test_initial_values() {
        let state = StatusState::new(false, true);
        assert!(!state.is_healthy());
        assert!(state.is_ready());
    }

    #[test]
    fn test_set_ready_is_idempotent() {
        let state = StatusState::new(true, false);
        state.set_ready(true);
        let once = (state.is_healthy(), state.is_ready());
        state.set_ready(true);
        assert_eq!((state.is_healthy(), state.is_ready()), once);
    }

    #[test]
    fn test_flags_are_independent() {
        let state = StatusState::new(true, true);
        state.set_healthy(false);
        assert!(!state.is_healthy());
        assert!(state.is_ready());
        state.set(StatusFlag::Ready, false);
        assert!(!state.get(StatusFlag::Ready));
        assert!(!state.get(StatusFlag::Health));
    }

    #[test]
    fn test_degrade_without_reset_schedules_nothing() {
        let scheduler = Arc::new(ManualScheduler::default());
        let state = StatusState::with_scheduler(true, true, scheduler.clone());

        state.degrade(StatusFlag::Health, None);
        state.degrade(StatusFlag::Health, Some(Duration::ZERO));

        assert!(!state.is_healthy());
        assert!(scheduler.delays().is_empty());
    }

    #[test]
    fn test_reset_overwrites_interim_value() {
        let scheduler = Arc::new(ManualScheduler::default());
        let state = StatusState::with_scheduler(true, true, scheduler.clone());

        state.degrade(StatusFlag::Ready, Some(Duration::from_secs(5)));
        assert_eq!(scheduler.delays(), vec![Duration::from_secs(5)]);

        // Explicitly set bad again; the pending reset still wins.
        state.set_ready(false);
        scheduler.fire_all();
        assert!(state.is_ready());
    }

    #[test]
    fn test_gate_checks_readiness_first() {
        let state = StatusState::new(false, false);
        assert_eq!(state.ensure_available(), Err(Unavailable::NotReady));

        state.set_ready(true);
        assert_eq!(state.ensure_available(), Err(Unavailable::NotHealthy));

        state.set_healthy(true);
        assert_eq!(state.ensure_available(), Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_degrade_health_recovers_after_delay() {
        let state = StatusState::new(true, true);
        state.degrade(StatusFlag::Health, Some(Duration::from_secs(2)));
        assert!(!state.is_healthy());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!state.is_healthy());

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(state.is_healthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_degrades_are_not_cancelled() {
        let state = StatusState::new(true, true);
        state.degrade(StatusFlag::Health, Some(Duration::from_secs(10)));
        state.degrade(StatusFlag::Health, Some(Duration::from_secs(1)));

        // The shorter, later timer fires first.
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert!(state.is_healthy());

        // A fresh degrade is undone by the first timer still pending.
        state.degrade(StatusFlag::Health, None);
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(state.is_healthy());
    }
}
