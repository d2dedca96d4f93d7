//! Core of the mimic test-double server.
//!
//! Holds the mutable health/readiness state, the proxy route tables and the
//! call relay. HTTP framework glue lives in `mimic-axum`; outbound HTTP,
//! timers and process faults are reached through [`ports`].
#![deny(unsafe_code)]

pub mod meta;
pub mod ports;
pub mod proxy;
pub mod relay;
pub mod status;

pub use meta::{HostMetadata, MetaError, resolve_version};
pub use ports::{
    FaultInjector, ResetScheduler, TokioScheduler, UpstreamClient, UpstreamError, UpstreamRequest,
    UpstreamResponse,
};
pub use proxy::{DynamicProxySource, ProxyRegistry, ProxyRoute, ProxyTable, ProxyTarget, RouteError};
pub use relay::{
    CallRelay, CallRequest, RelayError, Reply, forwarded_headers, relayed_headers, translate_response,
};
pub use status::{StatusFlag, StatusState, Unavailable};
