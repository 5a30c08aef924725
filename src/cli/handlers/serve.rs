//! Serve command handler

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;
use crate::state::AppState;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run the server, or only check the configuration when `dry_run` is set
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only().await
        } else {
            Server::new(self.config).run().await
        }
    }

    /// Check everything the server checks at startup, without binding
    ///
    /// # Errors
    /// - `Config` when a setting is invalid
    /// - `ConfigurationMissing` when no webhook URL is set
    /// - `Validation` when the webhook URL is unusable
    pub async fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");

        let state = AppState::from_settings(&self.config)?;
        state.notifications.validate().await?;
        println!("✓ Webhook is configured");

        if self.config.notifier.project_id.trim().is_empty() {
            println!("! notifier.project_id is empty");
        } else {
            println!("✓ Project: {}", self.config.notifier.project_id);
        }

        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
