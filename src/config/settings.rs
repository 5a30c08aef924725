//! Configuration settings structures
//!
//! Every structure deserializes from TOML and environment variables, and
//! every field has a default so an empty source set yields usable settings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::logger::{LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "gke-event-notifier".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_notifier_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    /// Environment the settings were loaded for; set by the loader
    #[serde(skip)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Push endpoint listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Notifier Configuration
// ============================================================================

/// Outbound webhook configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Slack incoming webhook URL. Holds a secret token.
    #[serde(default)]
    pub webhook_url: String,

    /// Cloud project the clusters live in, used in the suggested gcloud commands
    #[serde(default)]
    pub project_id: String,

    /// Timeout for one webhook call, in seconds
    #[serde(default = "default_notifier_timeout")]
    pub timeout_seconds: u64,
}

impl NotifierConfig {
    pub fn webhook_configured(&self) -> bool {
        !self.webhook_url.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            project_id: String::new(),
            timeout_seconds: default_notifier_timeout(),
        }
    }
}

// The webhook URL embeds its credentials, so it never reaches logs
impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field(
                "webhook_url",
                &if self.webhook_configured() {
                    "<redacted>"
                } else {
                    "<unset>"
                },
            )
            .field("project_id", &self.project_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to use colored output when writing to a terminal
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            colored: default_true(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime [`LoggerConfig`]
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.format", e.to_string()))?;

        LoggerConfig::new(self.level, format, self.colored)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
