//! Layered server configuration.
//!
//! Settings come from an optional TOML file overlaid with `TRIAGO_*`
//! environment variables. The upstream API key is deliberately not part of
//! this layer: it is read from `LYZR_API_KEY` at request time, and absence is
//! a hard configuration error rather than a silent default.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::lyzr::{DEFAULT_API_URL, LyzrConfig, MIN_REQUEST_INTERVAL};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bind address for the HTTP server.
    pub host: String,
    /// Bind port for the HTTP server.
    pub port: u16,
    /// Upstream inference endpoint URL.
    pub lyzr_api_url: String,
    /// Allowed CORS origins. Empty means local dev defaults.
    pub cors_origins: Vec<String>,
    /// Minimum spacing between outbound upstream calls, in milliseconds.
    pub min_request_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            lyzr_api_url: DEFAULT_API_URL.to_string(),
            cors_origins: Vec::new(),
            min_request_interval_ms: MIN_REQUEST_INTERVAL.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file plus `TRIAGO_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(Environment::with_prefix("TRIAGO"));

        let config = builder.build().context("loading configuration")?;
        config
            .try_deserialize()
            .context("parsing configuration values")
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    /// Upstream client configuration with production retry constants.
    pub fn lyzr_config(&self) -> LyzrConfig {
        LyzrConfig {
            api_url: self.lyzr_api_url.clone(),
            ..LyzrConfig::default()
        }
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}
