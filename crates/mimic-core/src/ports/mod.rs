//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define what the core expects from infrastructure: an outbound
//! HTTP client, a timer for delayed resets, and the process-level fault
//! injector. Adapters provide the implementations.
//!
//! # Design Rules
//!
//! - No HTTP framework types in any signature
//! - Methods and URLs travel as plain strings; adapters validate them
//! - Implementations must be shareable across request tasks (`Send + Sync`)

pub mod fault;
pub mod scheduler;
pub mod upstream;

pub use fault::FaultInjector;
pub use scheduler::{ResetScheduler, ResetTask, TokioScheduler};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};

#[cfg(test)]
pub use upstream::MockUpstreamClient;
