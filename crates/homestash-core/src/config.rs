//! Configuration for homestash
//!
//! Server settings are read from an optional TOML file and then overridden by
//! environment variables:
//!
//! ```toml
//! bind_addr = "0.0.0.0:3000"
//! database_path = "/var/lib/homestash/inventory.db"
//! default_page_size = 10
//! max_page_size = 1000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming a TOML config file
pub const CONFIG_PATH_ENV: &str = "HOMESTASH_CONFIG";
/// Environment variable overriding `bind_addr`
pub const BIND_ADDR_ENV: &str = "HOMESTASH_ADDR";
/// Environment variable overriding `database_path`
pub const DATABASE_PATH_ENV: &str = "HOMESTASH_DB";

/// Server-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// SQLite database file, created on first start
    pub database_path: PathBuf,
    /// Page size used when a list request gives no usable `limit`
    pub default_page_size: u32,
    /// Upper bound applied to a requested `limit`
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_path: default_database_path(),
            default_page_size: 10,
            max_page_size: 1000,
        }
    }
}

/// `<data dir>/homestash/inventory.db`, or `./inventory.db` when the platform
/// has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("homestash").join("inventory.db"))
        .unwrap_or_else(|| PathBuf::from("inventory.db"))
}

impl ServerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build the effective configuration from the process environment.
    ///
    /// Reads the file named by `HOMESTASH_CONFIG` if set, then applies
    /// `HOMESTASH_ADDR` and `HOMESTASH_DB`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(
            std::env::var(BIND_ADDR_ENV).ok(),
            std::env::var(DATABASE_PATH_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Apply explicit overrides on top of file or default values
    pub fn apply_overrides(&mut self, bind_addr: Option<String>, database_path: Option<String>) {
        if let Some(addr) = bind_addr.filter(|a| !a.trim().is_empty()) {
            self.bind_addr = addr;
        }
        if let Some(path) = database_path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("bind_addr must not be empty".to_string()));
        }

        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "default_page_size must be positive".to_string(),
            ));
        }

        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::Invalid(
                "max_page_size must be at least default_page_size".to_string(),
            ));
        }

        Ok(())
    }
}
