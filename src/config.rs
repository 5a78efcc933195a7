use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::paths::config_file_path;

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";

const ENV_API_KEY: &str = "POPCORN_OMDB_API_KEY";
const ENV_SEARCH_URL: &str = "POPCORN_SEARCH_URL";
const ENV_DETAIL_URL: &str = "POPCORN_DETAIL_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no OMDb API key configured; set {ENV_API_KEY} or `api.api_key` in config.toml")]
    MissingApiKey,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: GatewayConfig,
    pub ui: UiConfig,
}

/// Connection settings for the OMDb gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_key: String,
    pub search_base_url: String,
    pub detail_base_url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            search_base_url: DEFAULT_OMDB_URL.to_string(),
            detail_base_url: DEFAULT_OMDB_URL.to_string(),
            connect_timeout_ms: 3_000,
            read_timeout_ms: 8_000,
        }
    }
}

impl GatewayConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn require_api_key(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub initial_query: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            initial_query: "tokyo".to_string(),
        }
    }
}

impl Config {
    /// Loads the user file (explicit path, or the XDG default when it exists),
    /// then applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match config_file_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = non_blank(ENV_API_KEY) {
            self.api.api_key = key.trim().to_string();
        }
        if let Some(url) = non_blank(ENV_SEARCH_URL) {
            self.api.search_base_url = url;
        }
        if let Some(url) = non_blank(ENV_DETAIL_URL) {
            self.api.detail_base_url = url;
        }
    }
}
