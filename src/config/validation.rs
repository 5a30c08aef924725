//! Configuration validation logic

use reqwest::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{LoggerSettings, NotifierConfig, ServerConfig, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host cannot be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl NotifierConfig {
    /// Validate notifier configuration
    ///
    /// An unset webhook URL is accepted here; commands that deliver messages
    /// reject it when they build their provider.
    ///
    /// # Validation Rules
    /// - Webhook URL, when set, must be an absolute http(s) URL
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_configured() {
            let url = Url::parse(self.webhook_url.trim()).map_err(|e| {
                ConfigError::validation(
                    "notifier.webhook_url",
                    format!("Invalid URL format: {}", e),
                )
            })?;

            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(ConfigError::validation(
                    "notifier.webhook_url",
                    "URL must use http or https protocol.",
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "notifier.timeout_seconds",
                "Timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        let format = self.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(ConfigError::validation(
                "logger.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.notifier.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
