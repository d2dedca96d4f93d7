//! Host metadata and version reporting.

use std::env;
use std::net::IpAddr;

use thiserror::Error;
use tokio::net::UdpSocket;

/// Well-known external address used to pick the outbound interface.
/// Nothing is sent: connecting a UDP socket only selects a route.
pub const OUTBOUND_PROBE_ADDR: &str = "8.8.8.8:53";

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("error when resolving outbound IP: {0}")]
    OutboundIp(#[from] std::io::Error),
}

/// Identity of the host serving requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMetadata {
    pub ip: String,
    pub hostname: String,
}

impl HostMetadata {
    /// Resolve the outbound IP and read `HOSTNAME` (empty when unset).
    pub async fn detect() -> Result<Self, MetaError> {
        Ok(Self {
            ip: outbound_ip(OUTBOUND_PROBE_ADDR).await?.to_string(),
            hostname: env::var("HOSTNAME").unwrap_or_default(),
        })
    }
}

/// Local address of the interface that routes toward `probe`.
pub async fn outbound_ip(probe: &str) -> Result<IpAddr, MetaError> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(probe).await?;
    Ok(socket.local_addr()?.ip())
}

/// Version reported by `/version`: the override when set, else the build version.
pub fn resolve_version(version_override: Option<&str>) -> String {
    version_override
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(mimic_build_info::VERSION)
        .to_string()
}
