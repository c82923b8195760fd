use rayon::prelude::*;

use crate::engagement::{build_daily_series, DailySeries};
use crate::model::UnifiedMessage;
use crate::sentiment::MessageSentiment;
use crate::text::tokenize;
use crate::timing::{build_turns, extract_response_samples, ResponseSample, TurnSequence};

/// Once-computed intermediate records shared by every downstream stage.
///
/// Detectors receive this by reference instead of re-deriving turns, token
/// lists or message scores on their own, so each derivation happens exactly
/// once per invocation.
#[derive(Debug)]
pub struct Intermediates {
    /// Token lists parallel to the sanitized message slice; unsent or empty
    /// messages hold an empty list.
    pub tokens: Vec<Vec<String>>,
    pub turns: TurnSequence,
    pub response_samples: Vec<ResponseSample>,
    pub daily: Option<DailySeries>,
    /// Filled by the sentiment stage after the lexicon is selected.
    pub message_scores: Vec<MessageSentiment>,
}

impl Intermediates {
    /// Builds the text- and timing-derived intermediates. Tokenization runs
    /// on the ambient rayon pool.
    pub fn build(messages: &[UnifiedMessage], turn_merge_gap_secs: i64) -> Self {
        let tokens: Vec<Vec<String>> = messages
            .par_iter()
            .map(|message| message.text().map(tokenize).unwrap_or_default())
            .collect();
        let turns = build_turns(messages, turn_merge_gap_secs);
        let response_samples = extract_response_samples(&turns);
        let daily = build_daily_series(messages);
        Self {
            tokens,
            turns,
            response_samples,
            daily,
            message_scores: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, ts_ms: i64, text: &str) -> UnifiedMessage {
        UnifiedMessage {
            sender: sender.into(),
            timestamp_ms: ts_ms,
            content: Some(text.into()),
            reactions: Vec::new(),
            has_media: false,
            has_link: false,
            is_unsent: false,
        }
    }

    #[test]
    fn tokens_stay_parallel_to_messages() {
        let mut messages = vec![
            msg("a", 1_000, "hello there"),
            msg("b", 2_000, "hi!"),
        ];
        messages.push(UnifiedMessage {
            content: None,
            ..msg("a", 3_000, "")
        });
        let intermediates = Intermediates::build(&messages, 120);
        assert_eq!(intermediates.tokens.len(), 3);
        assert_eq!(intermediates.tokens[0], vec!["hello", "there"]);
        assert!(intermediates.tokens[2].is_empty());
        assert_eq!(intermediates.turns.len(), 3);
        assert_eq!(intermediates.response_samples.len(), 2);
    }
}
