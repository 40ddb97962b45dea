//! Mail item, MIME part tree and prefill draft types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a mail item. Opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The message currently displayed to the user, as reported by the host.
///
/// Resolved fresh on every prefill request and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailItem {
    /// Host identifier used to fetch the full content.
    pub id: Option<ItemId>,

    /// Decoded subject line. Empty when the message has none.
    pub subject: String,

    /// Sender, usually `"Display Name <addr>"`.
    pub author: Option<String>,

    /// Primary recipients (`To:`).
    pub recipients: Vec<String>,

    /// Carbon-copy recipients (`CC:`).
    pub cc_recipients: Vec<String>,

    /// Parsed `Date:` header.
    pub date: Option<DateTime<Utc>>,
}

impl MailItem {
    /// A bare item carrying only an identifier and subject.
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: Some(ItemId(id.into())),
            subject: subject.into(),
            ..Self::default()
        }
    }
}

/// One node of a message's MIME structure.
///
/// Leaves carry a textual `body`; multipart nodes carry `children` and are
/// not expected to have a meaningful body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePart {
    /// Lowercase `type/subtype` (e.g. `"text/plain"`, `"multipart/alternative"`).
    pub media_type: String,

    /// Decoded textual payload, only present on content leaves.
    pub body: Option<String>,

    /// Nested parts in document order.
    #[serde(default)]
    pub children: Vec<MessagePart>,
}

impl MessagePart {
    /// A content leaf.
    pub fn leaf(media_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            body: Some(body.into()),
            children: Vec::new(),
        }
    }

    /// A container part holding `children`.
    pub fn multipart(media_type: impl Into<String>, children: Vec<MessagePart>) -> Self {
        Self {
            media_type: media_type.into(),
            body: None,
            children,
        }
    }

    /// The body, if present and non-empty.
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

/// Subject and Markdown body handed to the card-creation form.
///
/// Serialized as `{"subject": "...", "body": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefillDraft {
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_ignores_empty_body() {
        assert_eq!(MessagePart::leaf("text/plain", "").text(), None);
        assert_eq!(MessagePart::leaf("text/plain", "hi").text(), Some("hi"));
        assert_eq!(MessagePart::multipart("multipart/mixed", vec![]).text(), None);
    }

    #[test]
    fn test_draft_serializes_as_pair() {
        let draft = PrefillDraft {
            subject: "Hi".into(),
            body: "text".into(),
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(json, r#"{"subject":"Hi","body":"text"}"#);
    }
}
