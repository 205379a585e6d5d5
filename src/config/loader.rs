//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::storage::StorageBackend;

/// Environment variable selecting the storage backend.
pub const ENV_STORAGE: &str = "STORAGE";
/// Environment variable overriding the listener address.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied before validation.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ServerConfig = toml::from_str(&content)?;
    finish(&mut config)?;
    tracing::debug!(path = ?path, "Configuration file loaded");
    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ServerConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut ServerConfig) -> Result<(), ConfigError> {
    apply_env_overrides(config, |key| std::env::var(key).ok())?;
    validate_config(config).map_err(ConfigError::Validation)
}

/// Apply `STORAGE` and `BIND_ADDRESS` overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_STORAGE) {
        config.storage.backend = value
            .parse::<StorageBackend>()
            .map_err(|message| ConfigError::Env {
                var: ENV_STORAGE,
                message,
            })?;
    }
    if let Some(value) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = value;
    }
    Ok(())
}
