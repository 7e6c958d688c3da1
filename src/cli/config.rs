//! Process configuration
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "env": "dev",
//!   "storage_path": "storage/storage.db",
//!   "http_server": { "address": "localhost:8082" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

/// Environment variable consulted when `--config` is absent
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Environment tag (optional, default "production")
    #[serde(default = "default_env")]
    pub env: String,

    /// SQLite database file (required)
    pub storage_path: PathBuf,

    /// Listener settings (optional)
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

fn default_env() -> String {
    "production".to_string()
}

impl Config {
    /// Load configuration from the given path, which clap has already
    /// filled from `CONFIG_PATH` when the flag was absent.
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        let path = path.ok_or_else(|| {
            CliError::config_error(format!(
                "config path is not set: pass --config or set {}",
                CONFIG_PATH_ENV
            ))
        })?;

        if !path.exists() {
            return Err(CliError::config_error(format!(
                "config file does not exist: {}",
                path.display()
            )));
        }

        Self::load(path)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.env.trim().is_empty() {
            return Err(CliError::config_error("env must not be empty"));
        }

        if self.storage_path.as_os_str().is_empty() {
            return Err(CliError::config_error("storage_path must not be empty"));
        }

        self.http_server
            .validate()
            .map_err(|e| CliError::config_error(format!("http_server: {}", e)))?;

        Ok(())
    }
}
