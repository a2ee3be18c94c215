//! Makoto Club Configuration Management
//!
//! Layered configuration (built-in defaults, an optional TOML file, then
//! `MAKOTO__`-prefixed environment variables) and logging initialisation.

pub mod error;
pub mod logging;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    AppConfig, ConfigManager as ConfigManagerTrait, DatabaseConfig, DatabaseMode, LoggingConfig,
    ServiceConfig,
};
