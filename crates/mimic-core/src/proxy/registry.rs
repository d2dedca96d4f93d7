//! Combined view over the API-managed table and the dynamic sources.

use std::sync::{PoisonError, RwLock};

use tracing::info;

use super::dynamic::DynamicProxySource;
use super::table::{ProxyRoute, ProxyTable, ProxyTarget, RouteError};

/// All proxy routes known to the server.
///
/// Static routes (managed through `/proxy`) are consulted before the
/// dynamic, file-backed ones. Locks are only held for the table operation
/// itself, never while forwarding.
#[derive(Debug, Default)]
pub struct ProxyRegistry {
    static_routes: RwLock<ProxyTable>,
    dynamic: DynamicProxySource,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static route.
    pub fn add(&self, route: ProxyRoute) -> Result<(), RouteError> {
        let mut table = self
            .static_routes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        table.add(route)?;
        if let Some(added) = table.routes().last() {
            info!(
                path = %added.path,
                method = %added.method,
                target = %added.proxy.url,
                "Added proxy route"
            );
        }
        Ok(())
    }

    /// Remove a static route.
    pub fn remove(&self, path: &str, method: &str) -> Result<(), RouteError> {
        let removed = self
            .static_routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path, method)?;
        info!(path = %removed.path, method = %removed.method, "Removed proxy route");
        Ok(())
    }

    /// Resolve a request to its target: static routes first, then dynamic.
    pub fn resolve(&self, path: &str, method: &str) -> Option<ProxyTarget> {
        let from_static = self
            .static_routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup(path, method)
            .cloned();
        from_static.or_else(|| self.dynamic.lookup(path, method))
    }

    /// Snapshot of the static routes.
    pub fn static_routes(&self) -> Vec<ProxyRoute> {
        self.static_routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .routes()
            .to_vec()
    }

    /// The file-backed sources.
    pub fn dynamic(&self) -> &DynamicProxySource {
        &self.dynamic
    }
}
