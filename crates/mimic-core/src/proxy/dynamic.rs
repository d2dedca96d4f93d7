//! File-keyed proxy tables supplied by an external watcher.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::info;

use super::table::{ProxyTable, ProxyTarget};

/// Proxy tables keyed by the identifier of the source that produced them
/// (for the directory watcher, the absolute file path).
///
/// Lookup iterates sources in hash order. Routes are not expected to
/// collide across files, so which source wins a collision is unspecified.
#[derive(Debug, Default)]
pub struct DynamicProxySource {
    sources: RwLock<HashMap<String, ProxyTable>>,
}

impl DynamicProxySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `table` as the whole contribution of `source_id`.
    pub fn replace(&self, source_id: impl Into<String>, table: ProxyTable) {
        let source_id = source_id.into();
        info!(source = %source_id, routes = table.len(), "Replacing dynamic proxy routes");
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(source_id, table);
    }

    /// Drop everything `source_id` contributed. Returns whether it was known.
    pub fn remove(&self, source_id: &str) -> bool {
        let removed = self
            .sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(source_id)
            .is_some();
        if removed {
            info!(source = %source_id, "Removed dynamic proxy routes");
        }
        removed
    }

    /// First match across all sources.
    pub fn lookup(&self, path: &str, method: &str) -> Option<ProxyTarget> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find_map(|table| table.lookup(path, method).cloned())
    }

    /// Whether `source_id` currently contributes a table.
    pub fn contains(&self, source_id: &str) -> bool {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(source_id)
    }

    /// Number of known sources.
    pub fn source_count(&self) -> usize {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyRoute;

    fn table_with(routes: &[(&str, &str)]) -> ProxyTable {
        let mut table = ProxyTable::new();
        for (path, url) in routes {
            table.add(ProxyRoute::new(*path, "GET", *url, "GET")).unwrap();
        }
        table
    }

    #[test]
    fn test_lookup_across_sources() {
        let source = DynamicProxySource::new();
        source.replace("/etc/a.yaml", table_with(&[("/a", "http://a")]));
        source.replace("/etc/b.yaml", table_with(&[("/b", "http://b")]));

        assert_eq!(source.lookup("/a", "GET").unwrap().url, "http://a");
        assert_eq!(source.lookup("/b", "GET").unwrap().url, "http://b");
        assert!(source.lookup("/c", "GET").is_none());
        assert_eq!(source.source_count(), 2);
    }

    #[test]
    fn test_replace_overwrites_instead_of_merging() {
        let source = DynamicProxySource::new();
        source.replace("f.yaml", table_with(&[("/old", "http://old")]));
        source.replace("f.yaml", table_with(&[("/new", "http://new")]));

        assert!(source.lookup("/old", "GET").is_none());
        assert_eq!(source.lookup("/new", "GET").unwrap().url, "http://new");
        assert_eq!(source.source_count(), 1);
    }

    #[test]
    fn test_remove_drops_whole_contribution() {
        let source = DynamicProxySource::new();
        source.replace("f.yaml", table_with(&[("/x", "http://x"), ("/y", "http://y")]));

        assert!(source.contains("f.yaml"));
        assert!(source.remove("f.yaml"));
        assert!(!source.contains("f.yaml"));
        assert!(source.lookup("/x", "GET").is_none());
        assert!(source.lookup("/y", "GET").is_none());
        assert!(!source.remove("f.yaml"));
    }
}
