//! Axum web adapter for the mimic test-double server.
//!
//! Wires the core services into an HTTP router: status and control
//! endpoints, the `/call` relay, proxy table management and the catch-all
//! proxy forwarder.
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod faults;
pub mod handlers;
mod headers;
pub mod routes;
pub mod state;
pub mod upstream;

// Re-export primary types
pub use bootstrap::{AxumContext, ServeExit, ServerConfig, bootstrap, serve, start_server};
pub use error::HttpError;
pub use faults::{Job, ProcessFaults, Spawner};
pub use routes::create_router;
pub use state::AppState;
pub use upstream::ReqwestUpstream;
