//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the shortener service
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Days before today covered by the default analytics range
    pub default_range_days: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_range_days: DEFAULT_RANGE_DAYS,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("CLICKCUT_API_URL") {
            config.api.base_url = url;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        url::Url::parse(&config.api.base_url).map_err(|e| Error::ConfigError {
            message: format!("api.base_url '{}' is not a URL: {}", config.api.base_url, e),
        })?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::clickcut_home()?.join("config.toml"))
    }

    /// Get the clickcut home directory
    pub fn clickcut_home() -> Result<PathBuf> {
        // Check CLICKCUT_HOME env var first
        if let Ok(home) = std::env::var("CLICKCUT_HOME") {
            return Ok(PathBuf::from(home));
        }

        // Use XDG directories
        ProjectDirs::from("dev", "clickcut", "clickcut")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine clickcut home directory".to_string(),
            })
    }

    /// Get the persisted session file path
    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::clickcut_home()?.join("session.json"))
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::clickcut_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_RANGE_DAYS: u32 = 30;
