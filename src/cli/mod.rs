//! Command-line interface
//!
//! Parses arguments, merges them over the loaded configuration and dispatches
//! to the `serve` or `format` handler.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::Settings;
use crate::config::error::ConfigError;
use crate::logger::{LoggerError, init_logger};

/// Load settings and apply the CLI overrides.
///
/// # Errors
/// Returns ConfigError if loading, merging or validation fails
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    let merger =
        ConfigurationMerger::load(cli.config.as_deref(), cli.env.map(Into::into))?;
    merger.merge_cli_args(cli)
}

/// Install the global subscriber described by `settings.logger`
pub fn init_logger_from_settings(settings: &Settings) -> Result<(), LoggerError> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .map_err(|e| LoggerError::config(e.to_string()))?;

    init_logger(&logger_config)
}
