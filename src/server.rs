//! HTTP server lifecycle: startup, serving pushes, graceful shutdown.

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Push endpoint server
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until a shutdown signal arrives.
    ///
    /// # Errors
    /// - `ConfigurationMissing` when no webhook URL is configured
    /// - `Validation` when the webhook URL is unusable
    /// - `Internal` when the address cannot be bound or serving fails
    pub async fn run(self) -> AppResult<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.settings.application.environment,
            "Application starting"
        );

        tracing::info!(
            notifier = ?self.settings.notifier,
            "Notifier configuration loaded"
        );

        if self.settings.notifier.project_id.trim().is_empty() {
            tracing::warn!(
                "notifier.project_id is empty, suggested gcloud commands will lack a project"
            );
        }

        let state = AppState::from_settings(&self.settings)?;
        state.notifications.validate().await?;
        tracing::info!(
            provider = state.notifications.provider_name(),
            "Notification provider ready"
        );

        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            AppError::from(anyhow::anyhow!("Failed to bind to {}: {}", address, e))
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::from(anyhow::Error::new(e).context("Server error")))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that branch never resolves and the other
/// signal still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_webhook_fails_fast() {
        let err = Server::new(Settings::default()).run().await.unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing { .. }));
    }

    #[tokio::test]
    async fn test_run_with_unusable_webhook_fails_fast() {
        let mut settings = Settings::default();
        settings.notifier.webhook_url = "ftp://example.com/hook".to_string();

        let err = Server::new(settings).run().await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
