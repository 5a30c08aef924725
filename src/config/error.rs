//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Sources were read but could not be deserialized into settings
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds an unacceptable value
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Dotted path of the offending setting
        field: String,
        message: String,
    },

    /// An environment variable holds an unacceptable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two selectors that cannot be combined were both set
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Error reported by the config crate
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
