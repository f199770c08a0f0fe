//! Command-line arguments and how they combine with the TOML config file
//!
//! Precedence, lowest first: built-in defaults, the `--config` file, then
//! individual flags.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use siprec_dialog_core::config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "siprec-server")]
#[command(version, about = "SIPREC recording server (UAS)")]
pub struct Args {
    /// TOML file with server settings
    #[arg(short, long, env = "SIPREC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the SIP UDP socket to
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// IP put in Contact headers and SDP instead of the discovered one
    #[arg(long)]
    pub advertise_ip: Option<IpAddr>,

    /// Seconds to wait for the ACK after the 200 OK
    #[arg(long)]
    pub ack_timeout: Option<u64>,

    /// Seconds between ACK and the server-initiated BYE
    #[arg(long)]
    pub teardown_after: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Parse a config file body
pub fn parse_config(contents: &str) -> Result<ServerConfig> {
    toml::from_str(contents).context("Invalid server configuration")
}

fn load_config_file(path: &Path) -> Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents)
}

impl Args {
    /// Build the effective server configuration
    pub fn server_config(&self) -> Result<ServerConfig> {
        let config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ServerConfig::default(),
        };
        let config = self.apply_overrides(config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = self.bind {
            config = config.with_bind_addr(bind);
        }
        if let Some(ip) = self.advertise_ip {
            config = config.with_advertised_ip(ip);
        }
        if let Some(secs) = self.ack_timeout {
            config = config.with_ack_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.teardown_after {
            config = config.with_teardown_after(Duration::from_secs(secs));
        }
        config
    }
}
