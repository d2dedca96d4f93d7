//! Real fault injection: process exit and unbounded resource consumers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use mimic_core::FaultInjector;

/// How long the graceful drain may take before the process is killed anyway.
const CRASH_BACKSTOP: Duration = Duration::from_secs(5);

/// Seed for the memory consumer; doubled until allocation fails.
const MEMORY_SEED: &str = "qwertyuiopasdfghjklzxcvbnm";

/// Work handed to a background OS thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Starts a [`Job`] in the background.
pub type Spawner = Arc<dyn Fn(Job) + Send + Sync>;

/// Fault injector acting on the running process.
///
/// A crash cancels the server's shutdown token and raises a flag that the
/// serve loop reports once the drain completes; the caller turns that into
/// a non-zero exit. A delayed `exit(1)` covers a drain that never finishes.
#[derive(Clone)]
pub struct ProcessFaults {
    shutdown: CancellationToken,
    crashed: Arc<AtomicBool>,
    spawn: Spawner,
    exit_backstop: Option<Duration>,
}

impl ProcessFaults {
    /// `shutdown` is the token the HTTP server drains on.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self {
            shutdown,
            crashed: Arc::new(AtomicBool::new(false)),
            spawn: Arc::new(|job: Job| {
                std::thread::spawn(job);
            }),
            exit_backstop: Some(CRASH_BACKSTOP),
        }
    }

    /// Run resource consumers through `spawn` instead of OS threads.
    #[must_use]
    pub fn with_spawner(mut self, spawn: Spawner) -> Self {
        self.spawn = spawn;
        self
    }

    /// Change (or disable) the forced exit after a crash.
    #[must_use]
    pub fn with_exit_backstop(mut self, backstop: Option<Duration>) -> Self {
        self.exit_backstop = backstop;
        self
    }
}

impl FaultInjector for ProcessFaults {
    fn crash(&self) {
        error!("Crash requested, shutting down the server and exiting");
        self.crashed.store(true, Ordering::SeqCst);
        self.shutdown.cancel();

        let Some(backstop) = self.exit_backstop else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(backstop).await;
                    error!("Graceful shutdown did not finish, exiting");
                    std::process::exit(1);
                });
            }
            Err(_) => std::process::exit(1),
        }
    }

    fn crash_requested(&self) -> bool {
        self.crashed.load(Ordering::SeqCst)
    }

    fn spike_memory(&self) {
        warn!("Memory spike requested, growing memory without bound");
        (self.spawn)(Box::new(|| {
            let mut spike = vec![MEMORY_SEED.to_string()];
            loop {
                spike.extend_from_within(..);
            }
        }));
    }

    fn spike_cpu(&self) {
        warn!("CPU spike requested, spinning a core forever");
        (self.spawn)(Box::new(|| {
            loop {
                std::hint::spin_loop();
            }
        }));
    }
}
