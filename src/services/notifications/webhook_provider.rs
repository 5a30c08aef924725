//! Slack incoming webhook provider.
//!
//! Posts Block Kit messages with the global `HTTP_CLIENT`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;

use super::provider::{NotificationProvider, NotificationResult};
use crate::config::NotifierConfig;
use crate::error::{AppError, AppResult};
use crate::events::WebhookMessage;
use crate::external::client::HTTP_CLIENT;

/// Settings key reported when the webhook URL is absent
const WEBHOOK_URL_KEY: &str = "notifier.webhook_url";

/// Slack incoming webhook provider
///
/// # Example
/// ```ignore
/// let provider = SlackWebhookProvider::new(&settings.notifier)?;
/// provider.validate_config().await?;
/// let result = provider.send(&message).await?;
/// ```
pub struct SlackWebhookProvider {
    webhook_url: String,
    timeout: Duration,
}

impl SlackWebhookProvider {
    /// Creates a provider for the configured webhook
    ///
    /// # Errors
    /// `ConfigurationMissing` when no webhook URL is configured
    pub fn new(config: &NotifierConfig) -> AppResult<Self> {
        if !config.webhook_configured() {
            return Err(AppError::ConfigurationMissing {
                key: WEBHOOK_URL_KEY.to_string(),
            });
        }

        Ok(Self {
            webhook_url: config.webhook_url.trim().to_string(),
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl NotificationProvider for SlackWebhookProvider {
    /// Posts the message as JSON to the webhook.
    ///
    /// Any transport error or non-2xx status fails the delivery.
    async fn send(&self, message: &WebhookMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();

        let response = HTTP_CLIENT
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(message)
            .send()
            .await
            .map_err(|e| AppError::Delivery {
                reason: e.without_url().to_string(),
                status_code: None,
            })?;

        let status = response.status();
        let body = response.text().await.ok();
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            return Err(AppError::Delivery {
                reason: format!(
                    "webhook responded with {}: {}",
                    status,
                    body.as_deref().unwrap_or_default()
                ),
                status_code: Some(status.as_u16()),
            });
        }

        Ok(NotificationResult {
            status_code: status.as_u16(),
            response: body,
            duration_ms,
        })
    }

    fn name(&self) -> &'static str {
        "slack_webhook"
    }

    /// Checks that the webhook URL is an absolute http(s) URL
    async fn validate_config(&self) -> AppResult<()> {
        let url = Url::parse(&self.webhook_url).map_err(|_| AppError::Validation {
            field: WEBHOOK_URL_KEY.to_string(),
            reason: "Invalid URL format".to_string(),
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(AppError::Validation {
                field: WEBHOOK_URL_KEY.to_string(),
                reason: "URL must use http or https protocol".to_string(),
            });
        }

        Ok(())
    }
}
