use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{GatewayError, Result};
use crate::http::Headers;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Gateway settings as read from a TOML file or the environment.
///
/// ```toml
/// base_url = "https://api.example.com"
/// rate_limit_delay_ms = 1000
/// timeout_seconds = 10
///
/// [default_headers]
/// Accept = "application/json"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GatewayConfig {
    pub base_url: String,
    #[serde(default)]
    pub default_headers: Headers,
    #[serde(default)]
    pub rate_limit_delay_ms: Option<u64>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub quiet: bool,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Headers::new(),
            rate_limit_delay_ms: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            quiet: false,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GatewayConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Reads `<PREFIX>_BASE_URL` (required) plus the optional
    /// `<PREFIX>_RATE_LIMIT_DELAY_MS`, `<PREFIX>_TIMEOUT_SECONDS` and
    /// `<PREFIX>_QUIET`. A `.env` file is honoured if present.
    pub fn from_env(prefix: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let keys = expected_env_keys(prefix);
        let base_url = env::var(&keys[0])?;
        let mut config = Self::new(base_url);

        if let Some(delay) = optional_env(&keys[1])? {
            config.rate_limit_delay_ms = Some(parse_env(&keys[1], &delay)?);
        }
        if let Some(timeout) = optional_env(&keys[2])? {
            config.timeout_seconds = parse_env(&keys[2], &timeout)?;
        }
        if let Some(quiet) = optional_env(&keys[3])? {
            config.quiet = matches!(quiet.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(config)
    }

    pub fn rate_limit_delay(&self) -> Option<Duration> {
        self.rate_limit_delay_ms.map(Duration::from_millis)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Environment keys read by [`GatewayConfig::from_env`], base URL first.
pub fn expected_env_keys(prefix: &str) -> Vec<String> {
    ["BASE_URL", "RATE_LIMIT_DELAY_MS", "TIMEOUT_SECONDS", "QUIET"]
        .iter()
        .map(|suffix| format!("{}_{}", prefix.to_ascii_uppercase(), suffix))
        .collect()
}

fn optional_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_env(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| GatewayError::Config(format!("{} must be an integer, got '{}'", key, value)))
}
