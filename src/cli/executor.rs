//! Command dispatch

use super::handlers::{FormatCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Execute the parsed command with merged settings.
///
/// No subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Format { input, send }) => {
            FormatCommandHandler::new(settings)
                .execute(input.as_ref(), *send)
                .await
        }
    }
}
