//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use mimic_core::{CallRelay, FaultInjector, ProxyRegistry, StatusState, UpstreamClient};

use crate::faults::ProcessFaults;
use crate::upstream::ReqwestUpstream;

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_address: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Health reported at startup.
    pub initial_health: bool,
    /// Readiness reported at startup.
    pub initial_readiness: bool,
    /// Replaces the build version in `/version` when set.
    pub version_override: Option<String>,
}

impl ServerConfig {
    pub fn with_defaults() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 4444,
            initial_health: true,
            initial_readiness: true,
            version_override: None,
        }
    }

    /// `host:port` form for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Application context for the Axum adapter.
///
/// Holds every service a handler may touch.
pub struct AxumContext {
    /// Health and readiness flags.
    pub status: Arc<StatusState>,
    /// Static and file-backed proxy routes.
    pub proxies: Arc<ProxyRegistry>,
    /// Outbound relay for `/call` and proxy forwarding.
    pub relay: CallRelay,
    /// Crash and resource-spike endpoints.
    pub faults: Arc<dyn FaultInjector>,
    /// Replaces the build version in `/version` when set.
    pub version_override: Option<String>,
}

impl AxumContext {
    /// Assemble a context from explicit parts.
    pub fn new(
        status: StatusState,
        upstream: Arc<dyn UpstreamClient>,
        faults: Arc<dyn FaultInjector>,
        version_override: Option<String>,
    ) -> Self {
        Self {
            status: Arc::new(status),
            proxies: Arc::new(ProxyRegistry::new()),
            relay: CallRelay::new(upstream),
            faults,
            version_override,
        }
    }
}

/// Build the production context.
///
/// `shutdown` is cancelled by the crash endpoint, so pass the same token
/// to [`serve`].
pub fn bootstrap(config: &ServerConfig, shutdown: CancellationToken) -> Result<AxumContext> {
    let upstream: Arc<dyn UpstreamClient> = Arc::new(ReqwestUpstream::with_defaults()?);
    let faults: Arc<dyn FaultInjector> = Arc::new(ProcessFaults::new(shutdown));

    info!(
        initial_health = config.initial_health,
        initial_readiness = config.initial_readiness,
        version = %mimic_core::resolve_version(config.version_override.as_deref()),
        "Bootstrapped server context"
    );

    Ok(AxumContext::new(
        StatusState::new(config.initial_health, config.initial_readiness),
        upstream,
        faults,
        config.version_override.clone(),
    ))
}

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeExit {
    /// Ctrl-C or an external cancellation.
    Shutdown,
    /// `/control/crash` was requested; the process should exit non-zero.
    Crashed,
}

/// Serve on a pre-bound listener until `shutdown` is cancelled or Ctrl-C.
pub async fn serve(
    listener: TcpListener,
    ctx: AxumContext,
    shutdown: CancellationToken,
) -> Result<ServeExit> {
    let addr = listener.local_addr()?;
    let faults = Arc::clone(&ctx.faults);
    let app = crate::routes::create_router(ctx);

    info!("mimic server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
            }
        })
        .await?;

    if faults.crash_requested() {
        error!("mimic server stopped after a requested crash");
        return Ok(ServeExit::Crashed);
    }
    info!("mimic server shut down");
    Ok(ServeExit::Shutdown)
}

/// Bind the configured address and serve.
pub async fn start_server(
    config: &ServerConfig,
    ctx: AxumContext,
    shutdown: CancellationToken,
) -> Result<ServeExit> {
    let listener = TcpListener::bind(config.addr()).await?;
    serve(listener, ctx, shutdown).await
}
