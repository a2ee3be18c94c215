//! Core configuration types and data structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Document database configuration
    pub database: DatabaseConfig,
    /// Service-level timeouts
    pub service: ServiceConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where documents are stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseMode {
    /// In-process store, lost on exit
    #[default]
    Memory,
    /// Remote database server
    Remote,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub mode: DatabaseMode,
    /// Server URL, required in remote mode
    pub url: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
    /// Collection holding store documents
    pub store_collection: String,
    /// Collection holding survey documents
    pub survey_collection: String,
}

/// Request handling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Deadline applied to each request, in milliseconds
    pub request_timeout_ms: u64,
    /// Budget for a detached survey notification, in milliseconds
    pub notify_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `makoto_persistence=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            mode: DatabaseMode::Memory,
            url: String::new(),
            username: String::new(),
            password: String::new(),
            namespace: "makoto-club".to_string(),
            database: "main".to_string(),
            store_collection: "stores".to_string(),
            survey_collection: "surveys".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            notify_timeout_ms: 5_000,
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration manager trait
pub trait ConfigManager {
    /// Load configuration
    fn load_config(&mut self) -> Result<AppConfig, crate::error::ConfigError>;
    /// Save configuration
    fn save_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
    /// Validate configuration
    fn validate_config(&self, config: &AppConfig) -> Result<(), crate::error::ConfigError>;
}
