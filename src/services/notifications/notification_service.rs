//! Notification service: classify, format, deliver.

use std::sync::Arc;

use super::provider::{NotificationProvider, NotificationResult};
use crate::error::AppResult;
use crate::events::{EventEnvelope, EventFormatter, WebhookMessage};

/// Turns one delivered event into one outbound message.
///
/// Holds only read-only configuration. Each call builds its own message, so
/// concurrent invocations share nothing mutable.
#[derive(Clone)]
pub struct NotificationService {
    formatter: EventFormatter,
    provider: Arc<dyn NotificationProvider>,
}

impl NotificationService {
    pub fn new(formatter: EventFormatter, provider: Arc<dyn NotificationProvider>) -> Self {
        Self {
            formatter,
            provider,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn formatter(&self) -> &EventFormatter {
        &self.formatter
    }

    /// Check the provider configuration without sending anything
    pub async fn validate(&self) -> AppResult<()> {
        self.provider.validate_config().await
    }

    /// Format the envelope without delivering it
    pub fn render(&self, envelope: &EventEnvelope) -> AppResult<WebhookMessage> {
        self.formatter.format(envelope)
    }

    /// Deliver an already formatted message
    pub async fn deliver(&self, message: &WebhookMessage) -> AppResult<NotificationResult> {
        let result = self.provider.send(message).await?;

        tracing::info!(
            provider = self.provider.name(),
            status_code = result.status_code,
            duration_ms = result.duration_ms,
            "Sent message to webhook"
        );

        Ok(result)
    }

    /// Format and deliver one event.
    ///
    /// Nothing is sent when formatting fails.
    ///
    /// # Errors
    /// Formatting errors (`PayloadParse`, `StructureNotFound`) and `Delivery`
    pub async fn handle(&self, envelope: &EventEnvelope) -> AppResult<NotificationResult> {
        let kind = envelope.kind();
        tracing::info!(
            event_kind = %kind,
            cluster = envelope.cluster_name(),
            location = envelope.cluster_location(),
            "Formatting cluster notification"
        );

        let message = self.render(envelope)?;
        self.deliver(&message).await
    }
}
