// Each test target compiles this module separately and uses a different
// subset of it.
#![allow(dead_code)]

use chatmetrics::model::{
    ConversationMetadata, ParsedConversation, Participant, Platform, Reaction, UnifiedMessage,
};

pub const MINUTE_MS: i64 = 60_000;
pub const HOUR_MS: i64 = 3_600_000;
pub const DAY_MS: i64 = 86_400_000;

/// Builds synthetic conversations for scenario tests.
pub struct ConversationBuilder {
    platform: Platform,
    participants: Vec<Participant>,
    messages: Vec<UnifiedMessage>,
}

impl ConversationBuilder {
    pub fn new(participant_ids: &[&str]) -> Self {
        let participants = participant_ids
            .iter()
            .map(|id| Participant {
                id: (*id).to_string(),
                display_name: id.to_uppercase(),
            })
            .collect();
        Self {
            platform: Platform::Messenger,
            participants,
            messages: Vec::new(),
        }
    }

    pub fn say(mut self, sender: &str, ts_ms: i64, text: &str) -> Self {
        self.messages.push(plain_message(sender, ts_ms, text));
        self
    }

    pub fn say_with_reaction(mut self, sender: &str, ts_ms: i64, text: &str, actor: &str) -> Self {
        let mut message = plain_message(sender, ts_ms, text);
        message.reactions.push(Reaction {
            actor: actor.to_string(),
            emoji: "❤️".to_string(),
        });
        self.messages.push(message);
        self
    }

    pub fn build(mut self) -> ParsedConversation {
        self.messages.sort_by_key(|m| m.timestamp_ms);
        let start = self.messages.first().map(|m| m.timestamp_ms).unwrap_or(0);
        let end = self.messages.last().map(|m| m.timestamp_ms).unwrap_or(0);
        let is_group = self.participants.len() > 2;
        ParsedConversation {
            platform: self.platform,
            participants: self.participants,
            messages: self.messages,
            metadata: ConversationMetadata {
                date_range_start: start,
                date_range_end: end,
                duration_days: ((end - start) / DAY_MS).max(1) as u32,
                is_group,
            },
        }
    }
}

pub fn plain_message(sender: &str, ts_ms: i64, text: &str) -> UnifiedMessage {
    UnifiedMessage {
        sender: sender.to_string(),
        timestamp_ms: ts_ms,
        content: Some(text.to_string()),
        reactions: Vec::new(),
        has_media: false,
        has_link: false,
        is_unsent: false,
    }
}
