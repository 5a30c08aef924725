use thiserror::Error;

use crate::config::error::ConfigError;

/// Application-wide error type.
///
/// Every failure is fatal for the invocation that hit it. Errors propagate to
/// the invocation boundary (HTTP handler or CLI command), which reports them
/// so the delivering platform can redeliver the event.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required configuration value is absent
    #[error("Configuration missing: {key}")]
    ConfigurationMissing { key: String },

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The upgrade event payload is not valid JSON of the expected shape
    #[error("Failed to parse upgrade event payload: {source}")]
    PayloadParse {
        #[source]
        source: serde_json::Error,
    },

    /// The resource path lacks the node pool segment the event type requires
    #[error("Resource type {resource_type} names no node pool in resource '{resource}'")]
    StructureNotFound {
        resource_type: String,
        resource: String,
    },

    /// The outbound webhook call failed or was rejected
    #[error("Failed to deliver message: {reason}")]
    Delivery {
        reason: String,
        status_code: Option<u16>,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AppError::ConfigurationMissing {
            key: "notifier.webhook_url".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration missing: notifier.webhook_url");

        let err = AppError::StructureNotFound {
            resource_type: "NODE_POOL".to_string(),
            resource: "projects/p/clusters/c".to_string(),
        };
        assert!(err.to_string().contains("NODE_POOL"));
        assert!(err.to_string().contains("projects/p/clusters/c"));

        let err = AppError::Delivery {
            reason: "connection refused".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "Failed to deliver message: connection refused");
    }

    #[test]
    fn test_payload_parse_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::PayloadParse { source };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal { .. }));
        assert_eq!(err.to_string(), "Internal error: boom");
    }

    #[test]
    fn test_from_config_error() {
        let err: AppError = ConfigError::validation("server.port", "must not be 0").into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("server.port"));
    }
}
