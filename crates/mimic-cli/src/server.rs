//! `mimic server`: compose the adapter, the watcher and the listener.

use std::time::Duration;

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mimic_axum::{ServeExit, bootstrap, start_server};

use crate::parser::ServerArgs;
use crate::watch::{ProxyWatcher, watch_proxy_dir};

/// Run the server until it is shut down.
///
/// A requested crash is returned as an error so the process exits non-zero.
pub async fn run(args: ServerArgs) -> Result<()> {
    if args.initial_delay > 0 {
        info!(seconds = args.initial_delay, "Delaying startup");
        tokio::time::sleep(Duration::from_secs(args.initial_delay)).await;
    }

    let config = args.server_config();
    let shutdown = CancellationToken::new();
    let ctx = bootstrap(&config, shutdown.clone())?;

    // Held for the lifetime of the server.
    let _watcher: Option<ProxyWatcher> = match args.proxy_dir() {
        Some(dir) if dir.is_dir() => match watch_proxy_dir(&dir, ctx.proxies.clone()).await {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Proxy route watching disabled: {e:#}");
                None
            }
        },
        Some(dir) => {
            warn!(path = %dir.display(), "Proxy config path does not exist, not watching");
            None
        }
        None => None,
    };

    match start_server(&config, ctx, shutdown).await? {
        ServeExit::Shutdown => Ok(()),
        ServeExit::Crashed => bail!("server crashed on request"),
    }
}
