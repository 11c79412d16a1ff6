#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "osm-gateway")]
#[command(about = "HTTP gateway for OSM map data and scraped location details")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Address to bind (overrides [server].host)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides [server].port)")]
    pub port: Option<u16>,

    #[arg(long, help = "Upstream request timeout in seconds")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
