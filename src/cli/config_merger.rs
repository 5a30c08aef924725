//! Merges CLI overrides into file and environment based configuration.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, Settings};

/// Applies CLI overrides on top of loaded settings.
///
/// Precedence, highest first: subcommand flags, global flags, then whatever
/// [`ConfigLoader`] produced.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load base settings from `config_path`, or from the layered sources
    /// when no path is given.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn load(
        config_path: Option<&Path>,
        environment: Option<Environment>,
    ) -> Result<Self, ConfigError> {
        let loader = match config_path {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match environment {
            Some(env) => loader.with_environment(env),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Apply CLI overrides and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
