//! Core notification provider trait and types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::events::WebhookMessage;

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// HTTP status code returned by the receiver
    pub status_code: u16,
    /// Response body, if it could be read
    pub response: Option<String>,
    /// Time taken for the call in milliseconds
    pub duration_ms: u64,
}

/// Transport that delivers a formatted message.
///
/// Uses `async_trait` so providers can be held as `Arc<dyn NotificationProvider>`.
/// Implementations deliver at most once per call: a failed send is reported
/// as an error and never retried here.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Deliver one message
    ///
    /// # Errors
    /// `Delivery` when the receiver cannot be reached or rejects the message
    async fn send(&self, message: &WebhookMessage) -> AppResult<NotificationResult>;

    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Check provider configuration before first use (default no-op)
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}
