//! Input contract shared with the platform normalizers.
//!
//! Export parsers (Messenger, WhatsApp, Instagram, Telegram, Discord) live
//! upstream and emit this unified shape as camelCase JSON. The engine only
//! ever reads it; nothing here is mutated after deserialization.

mod validate;

pub use validate::{sanitize_conversation, SanitizedConversation, SkippedCounts};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Source platform of an exported conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Messenger,
    Whatsapp,
    Instagram,
    Telegram,
    Discord,
    Other,
}

/// One member of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub display_name: String,
}

/// An emoji reaction left on a message by another participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub actor: String,
    pub emoji: String,
}

/// A single normalized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMessage {
    /// Empty when the field was missing upstream; sanitization drops and
    /// counts such messages instead of failing the parse.
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub timestamp_ms: i64,
    pub content: Option<String>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub has_media: bool,
    #[serde(default)]
    pub has_link: bool,
    #[serde(default)]
    pub is_unsent: bool,
}

impl UnifiedMessage {
    /// Timestamp as a chrono instant. Callers only see messages that passed
    /// sanitization, so the conversion cannot fail there.
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
    }

    /// Text body for metric purposes: unsent messages carry no usable text.
    pub fn text(&self) -> Option<&str> {
        if self.is_unsent {
            return None;
        }
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Date-range metadata emitted by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    pub date_range_start: i64,
    pub date_range_end: i64,
    pub duration_days: u32,
    pub is_group: bool,
}

/// Full conversation record consumed by [`crate::analyze`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConversation {
    pub platform: Platform,
    pub participants: Vec<Participant>,
    pub messages: Vec<UnifiedMessage>,
    pub metadata: ConversationMetadata,
}

impl ParsedConversation {
    pub fn participant_ids(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name.as_str())
    }
}
