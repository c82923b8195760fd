use std::collections::HashSet;

use serde::Serialize;

use super::{ParsedConversation, UnifiedMessage};

/// Per-reason tally of messages dropped during sanitization.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCounts {
    pub missing_sender: u32,
    pub invalid_timestamp: u32,
    pub unknown_sender: u32,
    /// Set when the input arrived out of order and had to be re-sorted.
    pub resorted: bool,
}

impl SkippedCounts {
    pub fn total(&self) -> u32 {
        self.missing_sender + self.invalid_timestamp + self.unknown_sender
    }
}

/// Messages that survived shape validation, in ascending timestamp order.
#[derive(Debug, Clone)]
pub struct SanitizedConversation {
    pub messages: Vec<UnifiedMessage>,
    pub skipped: SkippedCounts,
}

/// Drops malformed messages and restores timestamp order.
///
/// The normalizer promises sorted input with known senders; exports in the
/// wild occasionally break both promises, so violations are counted and
/// survived rather than failed.
pub fn sanitize_conversation(conversation: &ParsedConversation) -> SanitizedConversation {
    let known: HashSet<&str> = conversation
        .participants
        .iter()
        .map(|p| p.id.as_str())
        .collect();

    let mut skipped = SkippedCounts::default();
    let mut messages: Vec<UnifiedMessage> = Vec::with_capacity(conversation.messages.len());
    for message in &conversation.messages {
        if message.sender.trim().is_empty() {
            skipped.missing_sender += 1;
            continue;
        }
        if message.timestamp_ms <= 0 {
            skipped.invalid_timestamp += 1;
            continue;
        }
        if !known.contains(message.sender.as_str()) {
            skipped.unknown_sender += 1;
            continue;
        }
        messages.push(message.clone());
    }

    let sorted = messages
        .windows(2)
        .all(|pair| pair[0].timestamp_ms <= pair[1].timestamp_ms);
    if !sorted {
        messages.sort_by_key(|m| m.timestamp_ms);
        skipped.resorted = true;
    }

    SanitizedConversation { messages, skipped }
}
