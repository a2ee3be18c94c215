//! Logging initialisation
//!
//! `RUST_LOG`, when set, overrides the configured level.

use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, Result};
use crate::types::LoggingConfig;

/// Build the filter for `config`
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| ConfigError::Validation(format!("logging.level {:?}: {}", config.level, e))),
    }
}

/// Install the global subscriber, writing to stderr
///
/// Fails if a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::info!("Logging initialised at {}", config.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        let config = LoggingConfig {
            level: "makoto=verbose".to_string(),
            json: false,
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(filter(&config).is_err());
        }
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(matches!(init(&config), Err(ConfigError::Logging(_))));
    }
}
