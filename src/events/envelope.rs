//! Delivered event units.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::kind::EventKind;
use crate::error::{AppError, AppResult};

/// Attribute holding the event type marker
pub const ATTR_TYPE_URL: &str = "type_url";
/// Attribute holding the free-form payload (JSON for upgrade events)
pub const ATTR_PAYLOAD: &str = "payload";
/// Attribute holding the cluster name
pub const ATTR_CLUSTER_NAME: &str = "cluster_name";
/// Attribute holding the cluster location (region or zone)
pub const ATTR_CLUSTER_LOCATION: &str = "cluster_location";

/// One delivered event: binary payload plus string attributes.
///
/// Immutable once constructed. Missing attributes read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEnvelope {
    data: Vec<u8>,
    attributes: HashMap<String, String>,
}

impl EventEnvelope {
    pub fn new(data: impl Into<Vec<u8>>, attributes: HashMap<String, String>) -> Self {
        Self {
            data: data.into(),
            attributes,
        }
    }

    /// Raw message payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Attribute value, or `""` when absent
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn type_url(&self) -> &str {
        self.attribute(ATTR_TYPE_URL)
    }

    pub fn payload(&self) -> &str {
        self.attribute(ATTR_PAYLOAD)
    }

    pub fn cluster_name(&self) -> &str {
        self.attribute(ATTR_CLUSTER_NAME)
    }

    pub fn cluster_location(&self) -> &str {
        self.attribute(ATTR_CLUSTER_LOCATION)
    }

    /// Classify the envelope by its type marker
    pub fn kind(&self) -> EventKind {
        EventKind::from_type_url(self.type_url())
    }
}

/// Pub/Sub message as it appears on the wire, with base64 encoded data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// Base64 (standard alphabet) encoded payload
    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub attributes: HashMap<String, String>,

    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub publish_time: Option<String>,
}

impl PubsubMessage {
    /// Decode the message into an [`EventEnvelope`].
    ///
    /// # Errors
    /// `BadRequest` when `data` is not valid base64.
    pub fn into_envelope(self) -> AppResult<EventEnvelope> {
        let data = match self.data.as_deref() {
            Some(encoded) if !encoded.is_empty() => {
                STANDARD
                    .decode(encoded)
                    .map_err(|e| AppError::BadRequest {
                        message: format!("Message data is not valid base64: {}", e),
                    })?
            }
            _ => Vec::new(),
        };

        Ok(EventEnvelope::new(data, self.attributes))
    }
}
