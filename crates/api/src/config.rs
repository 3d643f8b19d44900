//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, an optional file, then
//! `WEATHER_ADVISOR__SECTION__KEY` environment variables. `GEMINI_API_KEY` is
//! honoured last.

use std::net::SocketAddr;

use advice_client::GeminiConfig;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

use crate::rate_limit::RateLimitConfig;

/// Config file looked up when `WEATHER_ADVISOR_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/weather-advisor";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bind_addr {:?}: {}", self.bind_addr, e)))
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("log_level {:?}", self.log_level)))
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load from `WEATHER_ADVISOR_CONFIG` or the default path
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WEATHER_ADVISOR_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a file (optional) plus the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("WEATHER_ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: AppConfig = settings.try_deserialize()?;

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                app.gemini.api_key = key;
            }
        }

        app.validate()?;
        Ok(app)
    }

    /// Check values the deserializer cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        self.server.level()?;
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::Invalid("gemini.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}
