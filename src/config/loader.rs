//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RedeemerConfig;
use crate::config::validation::ValidationError;

/// Environment variable holding the operator's signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "REDEEMER_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    MissingKey(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::MissingKey(var) => {
                write!(f, "Environment variable {} not set", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse configuration from a TOML file.
///
/// Semantic validation is left to the caller so command-line overrides can
/// be merged first.
pub fn load_config(path: &Path) -> Result<RedeemerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Read the signing key from `REDEEMER_PRIVATE_KEY`.
pub fn signing_key_from_env() -> Result<String, ConfigError> {
    signing_key_from(std::env::var(PRIVATE_KEY_ENV_VAR).ok())
}

fn signing_key_from(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingKey(PRIVATE_KEY_ENV_VAR)),
    }
}
