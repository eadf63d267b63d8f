//! Configuration management for the inventory console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with INVC__ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Inventory service connection
    pub api: ApiConfig,

    /// Where the access token is kept between runs
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Service root, without the `/api/v1` prefix
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Token file; defaults to `~/.invctl/session.json`
    pub token_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,

    /// Filter used when `RUST_LOG` is not set
    pub filter: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("INVC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("api.connect_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("log.json", false)?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("INVC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Defaults pointed at `base_url`, for tests and one-off tools
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            environment: "test".to_string(),
            api: ApiConfig {
                base_url: base_url.into(),
                ..ApiConfig::default()
            },
            session: SessionConfig::default(),
            log: LogConfig::default(),
        }
    }

    /// Resolved token file location
    pub fn token_path(&self) -> Option<PathBuf> {
        self.session.token_path.clone().or_else(|| {
            std::env::var("HOME").ok().map(|home| {
                let mut path = PathBuf::from(home);
                path.push(".invctl");
                path.push("session.json");
                path
            })
        })
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
