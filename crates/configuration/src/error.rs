use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration sources: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid dashboard default: {0}")]
    InvalidDefault(#[from] CoreError),

    #[error("Configuration validation error in '{key}': {reason}")]
    ValidationError { key: &'static str, reason: String },
}
