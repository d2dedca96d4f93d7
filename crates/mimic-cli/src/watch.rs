//! Proxy route directory watcher.
//!
//! Every `*.yaml`, `*.yml` or `*.json` file in the watched directory is one
//! dynamic proxy source, keyed by its absolute path. Existing files are
//! loaded up front; afterwards filesystem events keep the sources in sync.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use mimic_core::{ProxyRegistry, ProxyTable};

const ROUTE_FILE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Keeps the directory watch alive. Dropping it stops watching.
pub struct ProxyWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
    dir: PathBuf,
}

impl ProxyWatcher {
    /// The (canonical) directory being watched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for ProxyWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Whether `path` names a proxy route file.
pub fn is_route_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ROUTE_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn source_id(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Bring the source for `path` in line with the file on disk.
///
/// A missing file removes the source. A file that fails to parse is
/// logged and the previous routes are kept. So is an empty read of a file
/// that already has routes: editors and `>` redirection truncate before
/// writing, and the write arrives as a second event.
pub async fn sync_file(proxies: &ProxyRegistry, path: &Path) {
    let id = source_id(path);
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if proxies.dynamic().remove(&id) {
                info!(source = %id, "Removed proxy route file");
            }
            return;
        }
        Err(e) => {
            warn!(source = %id, "Failed to read proxy route file: {e}");
            return;
        }
    };

    if data.iter().all(u8::is_ascii_whitespace) && proxies.dynamic().contains(&id) {
        debug!(source = %id, "Proxy route file is empty, keeping previous routes");
        return;
    }

    match ProxyTable::from_yaml(&data) {
        Ok(table) => {
            info!(source = %id, routes = table.len(), "Loaded proxy route file");
            proxies.dynamic().replace(id, table);
        }
        Err(e) => error!(source = %id, "Keeping previous routes: {e}"),
    }
}

/// Load every route file already present in `dir`.
///
/// Returns the number of files considered.
pub async fn load_existing(proxies: &ProxyRegistry, dir: &Path) -> io::Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut loaded = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_route_file(&path) && entry.file_type().await?.is_file() {
            sync_file(proxies, &path).await;
            loaded += 1;
        }
    }
    Ok(loaded)
}

async fn handle_event(proxies: &ProxyRegistry, event: Event) {
    let paths = event.paths.iter().filter(|p| is_route_file(p));
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            for path in paths {
                sync_file(proxies, path).await;
            }
        }
        EventKind::Remove(_) => {
            for path in paths {
                let id = source_id(path);
                if proxies.dynamic().remove(&id) {
                    info!(source = %id, "Removed proxy route file");
                }
            }
        }
        _ => {}
    }
}

/// Load `dir` and start watching it for route file changes.
///
/// Must be called inside a tokio runtime.
pub async fn watch_proxy_dir(dir: &Path, proxies: Arc<ProxyRegistry>) -> Result<ProxyWatcher> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve proxy config path {}", dir.display()))?;

    let (tx, mut rx) = mpsc::channel(64);
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| match event {
        Ok(event) => {
            let _ = tx.blocking_send(event);
        }
        Err(e) => warn!("Proxy route watcher error: {e}"),
    })
    .context("Failed to create proxy route watcher")?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    let loaded = load_existing(&proxies, &dir)
        .await
        .with_context(|| format!("Failed to read {}", dir.display()))?;

    let task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            debug!(kind = ?event.kind, paths = ?event.paths, "Proxy route directory event");
            handle_event(&proxies, event).await;
        }
    });

    info!(dir = %dir.display(), files = loaded, "Watching proxy route directory");
    Ok(ProxyWatcher {
        _watcher: watcher,
        task,
        dir,
    })
}
