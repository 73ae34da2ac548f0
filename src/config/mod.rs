use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::graphql::DEFAULT_ENDPOINT;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Optional color overrides, as `#RRGGBB` or `#RGB`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ColorOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// GraphQL endpoint serving the episodes query
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub colors: ColorOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_timeout(),
            colors: ColorOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("portal");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep a broken file around for the user to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        if config.endpoint.trim().is_empty() {
            config.endpoint = default_endpoint();
        }
        if config.request_timeout_secs == 0 {
            config.request_timeout_secs = default_timeout();
        }
        Ok(config)
    }

    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
