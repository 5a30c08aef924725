//! Event to chat message formatting.

use super::envelope::EventEnvelope;
use super::kind::EventKind;
use super::message::{Block, TextObject, WebhookMessage};
use super::upgrade::UpgradeDetails;
use crate::error::AppResult;

/// Builds chat messages from cluster notification envelopes.
///
/// Output depends only on the envelope and the configured project, so a
/// redelivered event renders to the same message.
#[derive(Debug, Clone, Default)]
pub struct EventFormatter {
    project_id: String,
}

impl EventFormatter {
    /// Create a formatter for clusters in the given cloud project
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Format an envelope according to its event kind.
    ///
    /// Upgrade events get the structured rendering; every other kind is
    /// rendered by [`EventFormatter::format_security`].
    ///
    /// # Errors
    /// - `PayloadParse` when an upgrade payload is malformed
    /// - `StructureNotFound` when a node pool upgrade names no node pool
    pub fn format(&self, envelope: &EventEnvelope) -> AppResult<WebhookMessage> {
        match envelope.kind() {
            EventKind::Upgrade => self.format_upgrade(envelope),
            EventKind::SecurityBulletin | EventKind::Unrecognized(_) => {
                Ok(self.format_security(envelope))
            }
        }
    }

    /// Render an upgrade event: headline, start time, and the gcloud commands
    /// to inspect or cancel the operation.
    pub fn format_upgrade(&self, envelope: &EventEnvelope) -> AppResult<WebhookMessage> {
        let details = UpgradeDetails::parse(envelope.payload())?;
        let headline = details.headline(envelope.cluster_name())?;
        let location = envelope.cluster_location();

        let started = format!(
            "The operation started at {:?}",
            details.operation_start_time
        );
        let describe = format!(
            "To check the operation detail, please run `gcloud container operations --project '{}' describe '{}' --region '{}'`",
            self.project_id, details.operation, location
        );
        let cancel = format!(
            "To cancel the operation, please run `gcloud container operations --project '{}' cancel '{}' --region '{}'`",
            self.project_id, details.operation, location
        );

        Ok(WebhookMessage::new(vec![
            Block::title(headline),
            Block::section(TextObject::markdown(started)),
            Block::section(TextObject::markdown(describe)),
            Block::section(TextObject::markdown(cancel)),
        ]))
    }

    /// Render any other event as the raw payload plus the `payload` attribute.
    ///
    /// The schema of security bulletins is not modelled yet, so nothing is parsed.
    pub fn format_security(&self, envelope: &EventEnvelope) -> WebhookMessage {
        let text = String::from_utf8_lossy(envelope.data()).into_owned();

        WebhookMessage::new(vec![Block::section_with_fields(
            TextObject::plain(text),
            vec![TextObject::markdown(envelope.payload())],
        )])
    }
}
