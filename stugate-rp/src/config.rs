//! Configuration resolution for stugate-rp
//!
//! Per-field priority: CLI flag → environment variable → TOML config file →
//! compiled default. The CLI and environment tiers are both handled by clap;
//! the TOML file defaults to `~/.config/stugate/stugate-rp.toml`.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use stugate_common::{Error, Result};
use tracing::info;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5741";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SHORT_TTL_SECS: u64 = 300;
pub const DEFAULT_LONG_TTL_SECS: u64 = 86_400;

/// Command-line / environment overrides
#[derive(Debug, Default, Parser)]
#[command(name = "stugate-rp", about = "Records proxy for the upstream academic-records service")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "STUGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:5741
    #[arg(long, env = "STUGATE_BIND")]
    pub bind: Option<String>,

    /// Base URL of the upstream academic-records service
    #[arg(long = "upstream-url", env = "STUGATE_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Per-call timeout for data endpoints, in seconds
    #[arg(long, env = "STUGATE_UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,

    /// Per-call timeout for discovery endpoints, in seconds
    #[arg(long, env = "STUGATE_DISCOVERY_TIMEOUT_SECS")]
    pub discovery_timeout_secs: Option<u64>,

    /// TTL of the short (volatile records) cache tier, in seconds
    #[arg(long, env = "STUGATE_SHORT_TTL_SECS")]
    pub short_ttl_secs: Option<u64>,

    /// TTL of the long (near-static media) cache tier, in seconds
    #[arg(long, env = "STUGATE_LONG_TTL_SECS")]
    pub long_ttl_secs: Option<u64>,
}

/// TOML config file shape; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub upstream_base_url: Option<String>,
    pub upstream_timeout_secs: Option<u64>,
    pub discovery_timeout_secs: Option<u64>,
    pub short_ttl_secs: Option<u64>,
    pub long_ttl_secs: Option<u64>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub upstream_base_url: String,
    pub upstream_timeout_secs: u64,
    pub discovery_timeout_secs: u64,
    pub short_ttl_secs: u64,
    pub long_ttl_secs: u64,
}

impl Config {
    /// Resolve configuration from the CLI/environment and the TOML file
    pub fn load(cli: &Cli) -> Result<Config> {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(default_config_path);

        let toml_config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let parsed = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
            info!("Loaded config file: {}", path.display());
            parsed
        } else {
            TomlConfig::default()
        };

        Self::from_sources(cli, toml_config)
    }

    /// Merge the override tiers; pure, so tests can drive it directly
    pub fn from_sources(cli: &Cli, toml_config: TomlConfig) -> Result<Config> {
        let upstream_base_url = cli
            .upstream_url
            .clone()
            .or(toml_config.upstream_base_url)
            .ok_or_else(|| {
                Error::Config(
                    "Upstream base URL not configured. Set one of:\n\
                     1. --upstream-url flag\n\
                     2. STUGATE_UPSTREAM_URL environment variable\n\
                     3. upstream_base_url in ~/.config/stugate/stugate-rp.toml"
                        .to_string(),
                )
            })?;

        Ok(Config {
            bind_addr: cli
                .bind
                .clone()
                .or(toml_config.bind_addr)
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            upstream_base_url,
            upstream_timeout_secs: cli
                .upstream_timeout_secs
                .or(toml_config.upstream_timeout_secs)
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            discovery_timeout_secs: cli
                .discovery_timeout_secs
                .or(toml_config.discovery_timeout_secs)
                .unwrap_or(DEFAULT_DISCOVERY_TIMEOUT_SECS),
            short_ttl_secs: cli
                .short_ttl_secs
                .or(toml_config.short_ttl_secs)
                .unwrap_or(DEFAULT_SHORT_TTL_SECS),
            long_ttl_secs: cli
                .long_ttl_secs
                .or(toml_config.long_ttl_secs)
                .unwrap_or(DEFAULT_LONG_TTL_SECS),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn short_ttl(&self) -> Duration {
        Duration::from_secs(self.short_ttl_secs)
    }

    pub fn long_ttl(&self) -> Duration {
        Duration::from_secs(self.long_ttl_secs)
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stugate")
        .join("stugate-rp.toml")
}

// ========================================
// Tests
// ========================================
