use crate::model::UnifiedMessage;

/// A logical turn: consecutive messages from one sender, with short gaps
/// between them merged, treated as a single utterance for response timing.
#[derive(Debug, Clone)]
pub struct Turn {
    pub sender: String,
    pub start_ms: i64,
    pub end_ms: i64,
    /// Index range into the sanitized message slice (inclusive).
    pub first_index: usize,
    pub last_index: usize,
    pub message_count: u32,
}

/// Ordered turn view over one conversation, built once per invocation.
#[derive(Debug, Clone, Default)]
pub struct TurnSequence {
    pub turns: Vec<Turn>,
}

impl TurnSequence {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Folds the message stream into turns.
///
/// A turn extends while the sender stays the same and the gap to the next
/// message is at most `merge_gap_secs`; a longer same-sender gap starts a
/// fresh turn so a reply hours later is not timed against the start of the
/// earlier burst.
pub fn build_turns(messages: &[UnifiedMessage], merge_gap_secs: i64) -> TurnSequence {
    let merge_gap_ms = merge_gap_secs * 1000;
    let mut turns: Vec<Turn> = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        let extend = turns.last().map_or(false, |turn: &Turn| {
            turn.sender == message.sender && message.timestamp_ms - turn.end_ms <= merge_gap_ms
        });
        if extend {
            let turn = turns.last_mut().unwrap();
            turn.end_ms = message.timestamp_ms;
            turn.last_index = index;
            turn.message_count += 1;
        } else {
            turns.push(Turn {
                sender: message.sender.clone(),
                start_ms: message.timestamp_ms,
                end_ms: message.timestamp_ms,
                first_index: index,
                last_index: index,
                message_count: 1,
            });
        }
    }
    TurnSequence { turns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, ts_ms: i64) -> UnifiedMessage {
        UnifiedMessage {
            sender: sender.into(),
            timestamp_ms: ts_ms,
            content: Some("x".into()),
            reactions: Vec::new(),
            has_media: false,
            has_link: false,
            is_unsent: false,
        }
    }

    #[test]
    fn rapid_fire_messages_merge_into_one_turn() {
        let messages = vec![
            msg("a", 0),
            msg("a", 30_000),
            msg("a", 90_000),
            msg("b", 100_000),
        ];
        let sequence = build_turns(&messages, 120);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.turns[0].message_count, 3);
        assert_eq!(sequence.turns[0].start_ms, 0);
        assert_eq!(sequence.turns[0].end_ms, 90_000);
        assert_eq!(sequence.turns[1].sender, "b");
    }

    #[test]
    fn long_same_sender_gap_starts_a_new_turn() {
        let messages = vec![msg("a", 0), msg("a", 10 * 60 * 1000)];
        let sequence = build_turns(&messages, 120);
        assert_eq!(sequence.len(), 2);
    }

    #[test]
    fn indices_cover_the_message_slice() {
        let messages = vec![msg("a", 0), msg("a", 1_000), msg("b", 2_000), msg("a", 3_000)];
        let sequence = build_turns(&messages, 120);
        assert_eq!(sequence.turns[0].first_index, 0);
        assert_eq!(sequence.turns[0].last_index, 1);
        assert_eq!(sequence.turns[2].first_index, 3);
    }
}
