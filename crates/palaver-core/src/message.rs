//! Messages and drafts.

use crate::id::{Author, ChatId, MessageId};

/// Outgoing message content before it is committed to the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    /// Message text. May be empty when an image is attached.
    pub text: String,
    /// Optional attached image URL.
    pub image_url: Option<String>,
}

impl MessageDraft {
    /// A plain text draft.
    pub fn text(text: &str) -> Self {
        Self { text: text.to_owned(), image_url: None }
    }

    /// A draft carrying an image, with optional caption text.
    pub fn image(text: &str, image_url: &str) -> Self {
        Self { text: text.to_owned(), image_url: Some(image_url.to_owned()) }
    }

    /// Whether the draft has no sendable content.
    ///
    /// Whitespace-only text with no image counts as empty.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image_url.is_none()
    }
}

/// A committed message.
///
/// Messages are immutable once appended; the log is append-only and its
/// insertion order is its chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Log-unique id.
    pub id: MessageId,
    /// Who wrote it.
    pub author: Author,
    /// The conversation it belongs to.
    pub chat: ChatId,
    /// Message text.
    pub text: String,
    /// Optional attached image URL.
    pub image_url: Option<String>,
    /// Wall-clock send time in milliseconds.
    pub sent_at_ms: u64,
    /// Whether the session has seen this message. Own sends start read;
    /// simulated replies start unread.
    pub read: bool,
}
