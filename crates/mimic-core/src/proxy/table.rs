//! Proxy route records and the ordered table holding them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a matched request is forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTarget {
    pub url: String,
    #[serde(default)]
    pub method: String,
}

/// Maps an inbound `(path, method)` pair to a [`ProxyTarget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRoute {
    pub path: String,
    pub method: String,
    pub proxy: ProxyTarget,
}

impl ProxyRoute {
    pub fn new(
        path: impl Into<String>,
        method: impl Into<String>,
        target_url: impl Into<String>,
        target_method: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            proxy: ProxyTarget {
                url: target_url.into(),
                method: target_method.into(),
            },
        }
    }

    /// Check the route and upper-case both methods.
    ///
    /// An empty target method means "same as the inbound method".
    pub fn normalized(mut self) -> Result<Self, RouteError> {
        if !self.path.starts_with('/') {
            return Err(RouteError::Invalid(format!(
                "path '{}' must start with '/'",
                self.path
            )));
        }
        if self.method.trim().is_empty() {
            return Err(RouteError::Invalid("method must not be empty".into()));
        }
        if self.proxy.url.trim().is_empty() {
            return Err(RouteError::Invalid("proxy url must not be empty".into()));
        }

        self.method = self.method.trim().to_ascii_uppercase();
        self.proxy.method = match self.proxy.method.trim() {
            "" => self.method.clone(),
            m => m.to_ascii_uppercase(),
        };
        Ok(self)
    }

    fn matches(&self, path: &str, method: &str) -> bool {
        self.path == path && self.method == method
    }
}

/// Errors raised by route table operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("proxy configuration for url: {path} and method: {method} is already added")]
    AlreadyExists { path: String, method: String },

    #[error("proxy config with url {path} and {method} method is not found")]
    NotFound { path: String, method: String },

    #[error("invalid proxy configuration: {0}")]
    Invalid(String),

    #[error("unable to parse proxy routes: {0}")]
    Parse(String),
}

/// Ordered collection of proxy routes, unique by `(path, method)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTable {
    routes: Vec<ProxyRoute>,
}

impl ProxyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML (or JSON) sequence of route records.
    ///
    /// Every record is normalised; duplicates within the document are
    /// rejected like duplicate `add` calls.
    pub fn from_yaml(data: &[u8]) -> Result<Self, RouteError> {
        // An empty file is an empty table, not a parse error.
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let routes: Vec<ProxyRoute> =
            serde_yml::from_slice(data).map_err(|e| RouteError::Parse(e.to_string()))?;

        let mut table = Self::new();
        for route in routes {
            table.add(route)?;
        }
        Ok(table)
    }

    /// Append a route unless its `(path, method)` is already present.
    pub fn add(&mut self, route: ProxyRoute) -> Result<(), RouteError> {
        let route = route.normalized()?;
        if self.is_present(&route.path, &route.method) {
            return Err(RouteError::AlreadyExists {
                path: route.path,
                method: route.method,
            });
        }
        self.routes.push(route);
        Ok(())
    }

    /// Remove the route keyed by `(path, method)`.
    pub fn remove(&mut self, path: &str, method: &str) -> Result<ProxyRoute, RouteError> {
        let method = method.trim().to_ascii_uppercase();
        let index = self
            .routes
            .iter()
            .position(|r| r.matches(path, &method))
            .ok_or_else(|| RouteError::NotFound {
                path: path.to_string(),
                method: method.clone(),
            })?;
        Ok(self.routes.remove(index))
    }

    /// First route matching `(path, method)` exactly.
    pub fn lookup(&self, path: &str, method: &str) -> Option<&ProxyTarget> {
        self.routes
            .iter()
            .find(|r| r.matches(path, method))
            .map(|r| &r.proxy)
    }

    pub fn is_present(&self, path: &str, method: &str) -> bool {
        self.lookup(path, method).is_some()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in insertion order.
    pub fn routes(&self) -> &[ProxyRoute] {
        &self.routes
    }
}
