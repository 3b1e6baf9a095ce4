//! Runtime configuration: defaults, optional TOML file, then environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const ENV_ENDPOINT: &str = "BOTBRIDGE_ENDPOINT";
pub const ENV_TIMEOUT: &str = "BOTBRIDGE_TIMEOUT_SECS";
pub const ENV_AGENT_HEADER: &str = "BOTBRIDGE_AGENT_HEADER";
pub const ENV_LOG: &str = "BOTBRIDGE_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Supervisor-bot chat endpoint receiving `{ "q": ... }`.
    pub endpoint: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
    pub show_agent_header: bool,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/api/supervisor-bot".to_string(),
            request_timeout_secs: None,
            show_agent_header: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `path` if given, then `.env` and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;

        debug!(endpoint = %config.endpoint, timeout = ?config.request_timeout_secs, "Configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Applies `BOTBRIDGE_*` variables found through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: ENV_TIMEOUT,
                value: raw.clone(),
            })?;
            self.request_timeout_secs = Some(secs);
        }

        if let Some(raw) = lookup(ENV_AGENT_HEADER) {
            self.show_agent_header = parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                var: ENV_AGENT_HEADER,
                value: raw.clone(),
            })?;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
