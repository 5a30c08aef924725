//! Pub/Sub push request body.

use serde::Deserialize;

use crate::events::PubsubMessage;

/// Body Pub/Sub POSTs to a push subscription endpoint.
///
/// ```json
/// {
///   "message": {
///     "data": "SGVsbG8=",
///     "attributes": {"type_url": "type.googleapis.com/google.container.v1beta1.UpgradeEvent"},
///     "messageId": "136969346945",
///     "publishTime": "2024-01-01T00:00:00Z"
///   },
///   "subscription": "projects/my-project/subscriptions/gke-events"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PushRequest {
    pub message: PubsubMessage,

    #[serde(default)]
    pub subscription: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_push_body() {
        let body = r#"{
            "message": {
                "data": "aGk=",
                "attributes": {"cluster_name": "prod-1"},
                "messageId": "42",
                "message_id": "42",
                "publishTime": "2024-01-01T00:00:00Z"
            },
            "subscription": "projects/p/subscriptions/s"
        }"#;

        let request: PushRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.message.message_id.as_deref(), Some("42"));
        assert_eq!(request.subscription.as_deref(), Some("projects/p/subscriptions/s"));

        let envelope = request.message.into_envelope().unwrap();
        assert_eq!(envelope.data(), b"hi");
        assert_eq!(envelope.cluster_name(), "prod-1");
    }

    #[test]
    fn test_message_fields_default_to_empty() {
        let request: PushRequest = serde_json::from_str(r#"{"message": {}}"#).unwrap();
        assert!(request.subscription.is_none());

        let envelope = request.message.into_envelope().unwrap();
        assert!(envelope.data().is_empty());
        assert!(envelope.attributes().is_empty());
    }

    #[test]
    fn test_missing_message_is_rejected() {
        assert!(serde_json::from_str::<PushRequest>(r#"{"subscription": "s"}"#).is_err());
    }
}
