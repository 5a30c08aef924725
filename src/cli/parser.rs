//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Relays GKE cluster notifications to a Slack channel
#[derive(Parser, Debug)]
#[command(name = "gke-event-notifier")]
#[command(about = "Relays GKE cluster notifications from Pub/Sub to a Slack webhook")]
#[command(long_about = "
gke-event-notifier receives GKE cluster notifications (upgrade events and
security bulletins) from a Pub/Sub push subscription, formats them as Slack
Block Kit messages and posts them to an incoming webhook.

EXAMPLES:
    # Serve the push endpoint with default configuration
    gke-event-notifier serve

    # Serve on a custom port
    gke-event-notifier serve --port 9090

    # Use a custom configuration file
    gke-event-notifier --config /etc/gke-event-notifier/production.toml serve

    # Check configuration without starting the server
    gke-event-notifier serve --dry-run

    # Render a saved push body without sending it
    gke-event-notifier format --input push.json

    # Render from stdin and post it to the webhook
    cat push.json | gke-event-notifier format --send

The webhook URL and project id come from SLACK_WEBHOOK and PROJECT_ID, or
from the [notifier] section of the configuration.
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Use this TOML file instead of the layered files in the configuration
    /// directory. The file must exist and be readable.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` is layered over `default.toml`.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the Pub/Sub push endpoint (default)
    ///
    /// Examples:
    ///   gke-event-notifier serve
    ///   gke-event-notifier serve --host 127.0.0.1 --port 9090
    ///   gke-event-notifier serve --dry-run
    Serve {
        /// Host address to bind to
        ///
        /// Default: 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Default: 8080, or the PORT environment variable
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, taking precedence over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Render one event and print the Slack message
    ///
    /// Reads a push body (`{"message": {...}}`) or a bare message
    /// (`{"data": "...", "attributes": {...}}`) as JSON.
    ///
    /// Examples:
    ///   gke-event-notifier format --input push.json
    ///   gke-event-notifier format --input push.json --send
    Format {
        /// File to read the event from, `-` or absent for stdin
        #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_input_file_path)]
        input: Option<PathBuf>,

        /// Also post the rendered message to the configured webhook
        #[arg(long)]
        send: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["gke-event-notifier", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(["gke-event-notifier"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "gke-event-notifier",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--log-level",
            "debug",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                dry_run,
            }) => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9090));
                assert!(matches!(log_level, Some(LogLevel::Debug)));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_format_command() {
        let cli = Cli::try_parse_from(["gke-event-notifier", "format", "--send"]).unwrap();
        match cli.command {
            Some(Commands::Format { input, send }) => {
                assert!(input.is_none());
                assert!(send);
            }
            other => panic!("Expected Format command, got {:?}", other),
        }
    }

    #[test]
    fn test_env_alias() {
        let cli = Cli::try_parse_from(["gke-event-notifier", "--env", "prod"]).unwrap();
        assert!(matches!(cli.env, Some(Environment::Production)));
        assert_eq!(
            crate::config::Environment::from(Environment::Production),
            crate::config::Environment::Production
        );
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["gke-event-notifier", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["gke-event-notifier", "serve", "--port", "0"]).is_err());
    }
}
