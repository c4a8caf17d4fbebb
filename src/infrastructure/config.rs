//! Configuration management
//!
//! Loads configuration from config.toml at startup.
//! Every section has defaults, so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Where exchange snapshots are read from
    #[serde(default)]
    pub snapshots: SnapshotConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    /// Directory with one JSON document per exchange
    #[serde(default = "default_snapshot_dir")]
    pub directory: PathBuf,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Root directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,

    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            directory: default_snapshot_dir(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("exchanges")
}

fn default_api_port() -> u16 {
    5000
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from config.toml (or `CONFIG_PATH`)
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    /// Parse error (invalid TOML)
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
