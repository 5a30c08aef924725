//! Notification delivery with pluggable providers.
//!
//! `NotificationProvider` is the seam between message formatting and the
//! transport that carries the message. `SlackWebhookProvider` is the only
//! transport today.

mod notification_service;
mod provider;
mod webhook_provider;

pub use notification_service::NotificationService;
pub use provider::{NotificationProvider, NotificationResult};
pub use webhook_provider::SlackWebhookProvider;
