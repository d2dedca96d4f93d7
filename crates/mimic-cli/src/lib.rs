//! Command-line front end for the mimic server.
//!
//! [`parser`] turns flags and environment variables into a
//! [`ServerArgs`]; [`server::run`] wires the HTTP adapter together with
//! the proxy route directory watcher from [`watch`].
#![deny(unsafe_code)]

pub mod parser;
pub mod server;
pub mod watch;

pub use parser::{Cli, Commands, ServerArgs};
pub use watch::{ProxyWatcher, watch_proxy_dir};
