//! Proxy route tables.
//!
//! - [`ProxyTable`]: ordered routes, unique by `(path, method)`
//! - [`DynamicProxySource`]: tables keyed by the file that defined them
//! - [`ProxyRegistry`]: the lookup order used by the catch-all handler

mod dynamic;
mod registry;
mod table;

pub use dynamic::DynamicProxySource;
pub use registry::ProxyRegistry;
pub use table::{ProxyRoute, ProxyTable, ProxyTarget, RouteError};
