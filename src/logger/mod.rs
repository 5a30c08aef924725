//! Logger Module
//!
//! Console logging based on `tracing-subscriber`, in full, compact or JSON
//! format. Deployed instances write JSON so the platform's log collector can
//! index the structured fields.

pub mod config;
pub mod error;

pub use config::{LogFormat, LoggerConfig};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over the configured level so
/// individual targets can be tuned without a config change.
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    let level = config.parse_level()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let use_ansi = config.colored && std::io::stdout().is_terminal();
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_ansi(use_ansi).with_target(true).compact())
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    result.map_err(|e| LoggerError::init(e.to_string()))
}
