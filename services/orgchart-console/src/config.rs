//! Configuration types for the org chart console

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides the configured backend URL
pub const API_URL_ENV: &str = "ORGCHART_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Console web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_console_port")]
    pub port: u16,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_console_port(),
        }
    }
}

impl Config {
    /// Apply the backend URL overrides. The command line wins over the
    /// environment, which wins over the file. Blank values are ignored.
    pub fn apply_api_url(&mut self, cli: Option<String>, env: Option<String>) {
        let chosen = [cli, env]
            .into_iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty());
        if let Some(url) = chosen {
            self.api.base_url = url;
        }
    }

    /// Reject settings the console cannot start with
    pub fn validate(&self) -> crate::Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::ConsoleError::Config(format!(
                "API base URL must start with http:// or https://, got {:?}",
                self.api.base_url
            )));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_console_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::ConsoleError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
