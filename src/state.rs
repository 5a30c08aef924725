//! Application state shared with the Axum handlers.

use std::sync::Arc;

use crate::config::{ApplicationConfig, Settings};
use crate::error::AppResult;
use crate::events::EventFormatter;
use crate::services::NotificationService;
use crate::services::notifications::{NotificationProvider, SlackWebhookProvider};

/// Read-only state handed to every request.
///
/// Cloning is cheap: the provider sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub notifications: NotificationService,
    pub application: ApplicationConfig,
}

impl AppState {
    pub fn new(notifications: NotificationService, application: ApplicationConfig) -> Self {
        Self {
            notifications,
            application,
        }
    }

    /// Builds the state for the configured Slack webhook.
    ///
    /// # Errors
    /// `ConfigurationMissing` when no webhook URL is set
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let provider: Arc<dyn NotificationProvider> =
            Arc::new(SlackWebhookProvider::new(&settings.notifier)?);
        let formatter = EventFormatter::new(settings.notifier.project_id.clone());

        Ok(Self::new(
            NotificationService::new(formatter, provider),
            settings.application.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_from_settings_requires_webhook() {
        let err = AppState::from_settings(&Settings::default()).err().unwrap();
        assert!(matches!(err, AppError::ConfigurationMissing { .. }));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.notifier.webhook_url = "https://hooks.slack.com/services/T/B/X".to_string();
        settings.notifier.project_id = "my-project".to_string();

        let state = AppState::from_settings(&settings).unwrap();
        assert_eq!(state.notifications.provider_name(), "slack_webhook");
        assert_eq!(state.notifications.formatter().project_id(), "my-project");
        assert_eq!(state.application.name, "gke-event-notifier");
    }
}
