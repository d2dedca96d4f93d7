//! Main CLI parser and server arguments.
//!
//! Every server flag can also be supplied through an environment variable
//! (a `.env` file is loaded before parsing).

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use mimic_axum::ServerConfig;

/// Command-line interface for the mimic test-double server.
#[derive(Parser)]
#[command(name = "mimic")]
#[command(about = "Configurable HTTP server that impersonates other services")]
#[command(version = mimic_build_info::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Server(ServerArgs),
}

/// Flags accepted by `mimic server`.
#[derive(Debug, Clone, Args)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(short = 'a', long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    pub bind_address: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 4444)]
    pub port: u16,

    /// Health reported at startup
    #[arg(
        long,
        env = "INITIAL_HEALTH",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = lenient_bool
    )]
    pub initial_health: bool,

    /// Readiness reported at startup
    #[arg(
        long,
        env = "INITIAL_READINESS",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = lenient_bool
    )]
    pub initial_readiness: bool,

    /// Seconds to wait before binding the listener
    #[arg(long, env = "INITIAL_DELAY", default_value_t = 0)]
    pub initial_delay: u64,

    /// Directory watched for proxy route files (yaml, yml or json)
    #[arg(long, env = "PROXY_CONFIG_PATH", default_value = "")]
    pub proxy_config_path: String,

    /// Value reported by `/version` instead of the build version
    #[arg(long, env = "VERSION")]
    pub version_override: Option<String>,
}

impl ServerArgs {
    /// The proxy route directory, if one was given.
    pub fn proxy_dir(&self) -> Option<PathBuf> {
        let trimmed = self.proxy_config_path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    /// Settings consumed by the HTTP adapter.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address.clone(),
            port: self.port,
            initial_health: self.initial_health,
            initial_readiness: self.initial_readiness,
            version_override: self
                .version_override
                .clone()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Parse a boolean flag, treating anything unrecognised as `true`.
fn lenient_bool(raw: &str) -> Result<bool, Infallible> {
    Ok(!matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "f"
    ))
}
