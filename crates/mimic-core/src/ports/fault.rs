//! Fault injection port.
//!
//! Crashing the process and exhausting CPU or memory are deliberate
//! destabilisations requested by an operator. They are fatal by contract,
//! so the core only triggers them and never recovers from them.

/// Process-level fault injection.
pub trait FaultInjector: Send + Sync {
    /// Attempt a graceful shutdown, then terminate the process.
    fn crash(&self);

    /// Whether [`crash`](Self::crash) has been requested.
    ///
    /// The server checks this after draining so the process can exit with
    /// a failure status instead of a clean one.
    fn crash_requested(&self) -> bool;

    /// Start a background consumer that grows memory without bound.
    fn spike_memory(&self);

    /// Start a background consumer that spins a CPU core forever.
    fn spike_cpu(&self);
}
