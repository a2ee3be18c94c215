//! Configuration manager implementation

use std::collections::HashSet;
use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    error::{ConfigError, Result},
    types::{AppConfig, ConfigManager as ConfigManagerTrait, DatabaseMode},
};

/// Default environment prefix; `MAKOTO__DATABASE__MODE=remote` sets `database.mode`
pub const DEFAULT_ENV_PREFIX: &str = "MAKOTO";

/// Separator between the prefix and nested keys
const ENV_SEPARATOR: &str = "__";

/// Configuration manager
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at
/// `config_path` (optional), environment variables under `env_prefix`.
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("makoto-club")
            .join("config.toml")
    }
}

impl ConfigManagerTrait for ConfigManager {
    fn load_config(&mut self) -> Result<AppConfig> {
        debug!("Loading configuration from {:?}", self.config_path);
        let builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        self.validate_config(&app_config)?;
        Ok(app_config)
    }

    fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }

    fn validate_config(&self, config: &AppConfig) -> Result<()> {
        let db = &config.database;
        if db.mode == DatabaseMode::Remote && db.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.url is required in remote mode".to_string(),
            ));
        }
        for (key, value) in [
            ("database.namespace", &db.namespace),
            ("database.database", &db.database),
            ("database.store_collection", &db.store_collection),
            ("database.survey_collection", &db.survey_collection),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        let names: HashSet<&str> = [db.store_collection.as_str(), db.survey_collection.as_str()]
            .into_iter()
            .collect();
        if names.len() != 2 {
            return Err(ConfigError::Validation(
                "store and survey collections must differ".to_string(),
            ));
        }

        if config.service.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "service.request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if config.service.notify_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "service.notify_timeout_ms must be greater than 0".to_string(),
            ));
        }

        EnvFilter::try_new(&config.logging.level).map_err(|e| {
            ConfigError::Validation(format!("logging.level {:?}: {}", config.logging.level, e))
        })?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        ConfigManager::with_path(PathBuf::from("/nonexistent/makoto.toml"))
            .with_env_prefix("MAKOTO_UNIT_TEST_UNSET")
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = manager().load_config().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_remote_requires_url() {
        let mut config = AppConfig::default();
        config.database.mode = DatabaseMode::Remote;
        assert!(manager().validate_config(&config).is_err());

        config.database.url = "localhost:8000".to_string();
        assert!(manager().validate_config(&config).is_ok());
    }

    #[test]
    fn test_collections_must_differ() {
        let mut config = AppConfig::default();
        config.database.survey_collection = "stores".to_string();
        let err = manager().validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.service.request_timeout_ms = 0;
        assert!(manager().validate_config(&config).is_err());
    }
}
