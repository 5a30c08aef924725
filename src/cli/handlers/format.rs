//! Format command handler
//!
//! Renders one event offline, which is handy for checking how a captured
//! push will look in Slack before wiring up the subscription.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::io::AsyncReadExt;

use crate::api::dto::PushRequest;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::events::{EventEnvelope, EventFormatter, PubsubMessage, WebhookMessage};
use crate::state::AppState;

/// A message given on its own rather than wrapped in a push body.
///
/// Unknown keys are rejected so that unrelated JSON is not mistaken for an
/// empty message.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BareMessage {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    publish_time: Option<String>,
}

impl From<BareMessage> for PubsubMessage {
    fn from(message: BareMessage) -> Self {
        PubsubMessage {
            data: message.data,
            attributes: message.attributes,
            message_id: message.message_id,
            publish_time: message.publish_time,
        }
    }
}

fn invalid_input(e: serde_json::Error) -> AppError {
    AppError::BadRequest {
        message: format!("Input is not a Pub/Sub message: {}", e),
    }
}

/// Parse a push body or a bare message into an envelope.
///
/// An object with a `message` key is read as a push body, anything else as
/// a bare message.
///
/// # Errors
/// `BadRequest` when the input is not JSON of either shape or `data` is not
/// base64
pub fn parse_envelope(raw: &str) -> AppResult<EventEnvelope> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(invalid_input)?;

    let message = if value.get("message").is_some() {
        serde_json::from_value::<PushRequest>(value)
            .map_err(invalid_input)?
            .message
    } else {
        serde_json::from_value::<BareMessage>(value)
            .map_err(invalid_input)?
            .into()
    };

    message.into_envelope()
}

/// Handler for the format command
pub struct FormatCommandHandler {
    config: Settings,
}

impl FormatCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Render the event read from `input` (stdin when absent or `-`), print
    /// it, and deliver it when `send` is set.
    pub async fn execute(&self, input: Option<&PathBuf>, send: bool) -> AppResult<()> {
        let raw = read_input(input.map(PathBuf::as_path)).await?;
        let envelope = parse_envelope(&raw)?;

        let message = self.render(&envelope)?;
        let rendered = serde_json::to_string_pretty(&message).map_err(|e| {
            AppError::from(anyhow::Error::new(e).context("Failed to serialize message"))
        })?;
        println!("{}", rendered);

        if send {
            let state = AppState::from_settings(&self.config)?;
            let result = state.notifications.deliver(&message).await?;
            eprintln!(
                "Delivered to {} ({} in {} ms)",
                state.notifications.provider_name(),
                result.status_code,
                result.duration_ms
            );
        }

        Ok(())
    }

    /// Render with the configured project; needs no webhook
    pub fn render(&self, envelope: &EventEnvelope) -> AppResult<WebhookMessage> {
        EventFormatter::new(self.config.notifier.project_id.clone()).format(envelope)
    }
}

async fn read_input(input: Option<&Path>) -> AppResult<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            tokio::fs::read_to_string(path).await.map_err(|e| {
                AppError::from(anyhow::Error::new(e).context(format!(
                    "Failed to read input file {}",
                    path.display()
                )))
            })
        }
        _ => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .map_err(|e| {
                    AppError::from(anyhow::Error::new(e).context("Failed to read stdin"))
                })?;
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde_json::json;
    use std::io::Write;

    fn upgrade_attributes() -> serde_json::Value {
        json!({
            "type_url": "type.googleapis.com/google.container.v1beta1.UpgradeEvent",
            "cluster_name": "prod-1",
            "cluster_location": "us-east1",
            "payload": "{\"resourceType\":\"MASTER\",\"currentVersion\":\"1.2\",\"targetVersion\":\"1.3\",\"operationStartTime\":\"2024-01-01T00:00Z\",\"operation\":\"op-1\"}"
        })
    }

    #[test]
    fn test_parse_push_body() {
        let raw = json!({
            "message": {"data": STANDARD.encode("hello"), "attributes": upgrade_attributes()},
            "subscription": "projects/p/subscriptions/s"
        })
        .to_string();

        let envelope = parse_envelope(&raw).unwrap();
        assert_eq!(envelope.data(), b"hello");
        assert_eq!(envelope.cluster_name(), "prod-1");
    }

    #[test]
    fn test_parse_bare_message() {
        let raw = json!({"data": STANDARD.encode("bulletin"), "attributes": {"payload": "p"}})
            .to_string();

        let envelope = parse_envelope(&raw).unwrap();
        assert_eq!(envelope.data(), b"bulletin");
        assert_eq!(envelope.payload(), "p");
    }

    #[test]
    fn test_parse_rejects_malformed_push_message() {
        let raw = json!({"message": {"data": 5, "attributes": {"type_url": "x.UpgradeEvent"}}})
            .to_string();
        assert!(matches!(
            parse_envelope(&raw),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unrelated_object() {
        for raw in [r#"{"foo": 1}"#, r#"{"totally": "unrelated"}"#, "[1, 2]"] {
            assert!(
                matches!(parse_envelope(raw), Err(AppError::BadRequest { .. })),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_envelope("not json"),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_render_uses_configured_project() {
        let mut config = Settings::default();
        config.notifier.project_id = "my-project".to_string();
        let handler = FormatCommandHandler::new(config);

        let raw = json!({"attributes": upgrade_attributes()}).to_string();
        let message = handler.render(&parse_envelope(&raw).unwrap()).unwrap();

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["blocks"][0]["type"], "header");
        assert!(value.to_string().contains("--project 'my-project'"));
    }

    #[tokio::test]
    async fn test_execute_from_file_without_send() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json!({"attributes": upgrade_attributes()})).unwrap();

        let handler = FormatCommandHandler::new(Settings::default());
        let path = file.path().to_path_buf();
        assert!(handler.execute(Some(&path), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_send_without_webhook_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", json!({"data": STANDARD.encode("x")})).unwrap();

        let handler = FormatCommandHandler::new(Settings::default());
        let path = file.path().to_path_buf();
        let result = handler.execute(Some(&path), true).await;
        assert!(matches!(
            result,
            Err(AppError::ConfigurationMissing { .. })
        ));
    }
}
