//! Slack Block Kit message model.
//!
//! Only the subset of Block Kit the notifier emits is modelled: header and
//! section blocks holding plain text or mrkdwn text objects.
//! Reference: https://api.slack.com/reference/block-kit/blocks

use serde::{Deserialize, Serialize};

/// Slack rejects header blocks whose text exceeds this many characters.
pub const HEADER_MAX_CHARS: usize = 150;

/// Rendering style of a text object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    #[serde(rename = "plain_text")]
    PlainText,
    #[serde(rename = "mrkdwn")]
    Markdown,
}

/// Block Kit text composition object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Markdown,
            text: text.into(),
        }
    }
}

/// A single display block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<TextObject>,
    },
}

impl Block {
    /// Title block for `text`.
    ///
    /// Renders as a header block, falling back to a plain text section when the
    /// text is longer than [`HEADER_MAX_CHARS`]. The limit counts characters,
    /// not UTF-8 bytes, matching how Slack measures header text.
    pub fn title(text: impl Into<String>) -> Self {
        let text = text.into();
        let length = text.chars().count();
        if length > HEADER_MAX_CHARS {
            tracing::warn!(
                length,
                limit = HEADER_MAX_CHARS,
                "Header text exceeds the length limit, rendering as section"
            );
            Block::section(TextObject::plain(text))
        } else {
            Block::Header {
                text: TextObject::plain(text),
            }
        }
    }

    pub fn section(text: TextObject) -> Self {
        Block::Section {
            text: Some(text),
            fields: Vec::new(),
        }
    }

    pub fn section_with_fields(text: TextObject, fields: Vec<TextObject>) -> Self {
        Block::Section {
            text: Some(text),
            fields,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Block::Header { .. })
    }

    /// Main text of the block, if any
    pub fn text(&self) -> Option<&TextObject> {
        match self {
            Block::Header { text } => Some(text),
            Block::Section { text, .. } => text.as_ref(),
        }
    }

    pub fn fields(&self) -> &[TextObject] {
        match self {
            Block::Header { .. } => &[],
            Block::Section { fields, .. } => fields,
        }
    }
}

/// Message body accepted by a Slack incoming webhook.
///
/// Built once per event and sent once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl WebhookMessage {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Text of the leading block, whichever way it is rendered
    pub fn headline(&self) -> Option<&str> {
        self.blocks
            .first()
            .and_then(Block::text)
            .map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_header_serialization() {
        let block = Block::title("Cluster upgrade");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "header", "text": {"type": "plain_text", "text": "Cluster upgrade"}})
        );
    }

    #[test]
    fn test_section_serialization_omits_empty_fields() {
        let block = Block::section(TextObject::markdown("*bold*"));
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "section", "text": {"type": "mrkdwn", "text": "*bold*"}})
        );
    }

    #[test]
    fn test_section_with_fields_serialization() {
        let block = Block::section_with_fields(
            TextObject::plain("raw"),
            vec![TextObject::markdown("field")],
        );
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "section",
                "text": {"type": "plain_text", "text": "raw"},
                "fields": [{"type": "mrkdwn", "text": "field"}]
            })
        );
    }

    #[test]
    fn test_title_at_limit_is_header() {
        let block = Block::title("a".repeat(HEADER_MAX_CHARS));
        assert!(block.is_header());
    }

    #[test]
    fn test_title_over_limit_falls_back_to_section() {
        let text = "a".repeat(HEADER_MAX_CHARS + 1);
        let block = Block::title(text.clone());
        assert!(!block.is_header());
        assert_eq!(block.text(), Some(&TextObject::plain(text)));
        assert!(block.fields().is_empty());
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        // 150 multi-byte characters still fit in a header
        let block = Block::title("é".repeat(HEADER_MAX_CHARS));
        assert!(block.is_header());
    }

    #[test]
    fn test_message_shape() {
        let message = WebhookMessage::new(vec![
            Block::title("headline"),
            Block::section(TextObject::markdown("details")),
        ]);
        assert_eq!(message.headline(), Some("headline"));

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["blocks"].as_array().unwrap().len(), 2);
        assert_eq!(value["blocks"][0]["type"], "header");
        assert_eq!(value["blocks"][1]["type"], "section");

        let parsed: WebhookMessage = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn test_empty_message_has_no_headline() {
        assert_eq!(WebhookMessage::default().headline(), None);
    }

    proptest! {
        #[test]
        fn property_title_rendering_follows_threshold(text in "[a-zA-Z0-9 .]{0,300}") {
            let block = Block::title(text.clone());
            prop_assert_eq!(block.is_header(), text.chars().count() <= HEADER_MAX_CHARS);
            prop_assert_eq!(block.text().map(|t| t.text.as_str()), Some(text.as_str()));
        }
    }
}
