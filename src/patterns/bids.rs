use std::collections::HashMap;

use serde::Serialize;

use crate::config::PatternSettings;
use crate::model::UnifiedMessage;

/// Invitation phrasings that make a message a bid even without a question.
const INVITATION_MARKERS: &[&str] = &[
    "let's",
    "lets ",
    "wanna",
    "want to",
    "do you want",
    "come over",
    "come with",
    "join me",
    "join us",
    "you should come",
    "you free",
    "are you free",
    "up for",
    "how about",
    "what about",
    "check this out",
    "look at this",
];

/// Stock replies that never count as turning toward, whatever their length.
const DISMISSIVE_REPLIES: &[&str] = &[
    "whatever",
    "if you say so",
    "i guess",
    "who cares",
    "don't care",
    "dont care",
    "doesn't matter",
    "doesnt matter",
    "not now",
    "can't talk",
    "cant talk",
];

const MIN_SUBSTANTIVE_WORDS: usize = 2;
const MIN_SUBSTANTIVE_CHARS: usize = 10;

/// Bid/response (turning-toward) block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidStats {
    pub total_bids: u32,
    pub turning_toward: u32,
    pub turning_away: u32,
    pub bids_by_person: HashMap<String, u32>,
    pub toward_by_responder: HashMap<String, u32>,
    /// `None` below the configured bid minimum.
    pub toward_rate: Option<f64>,
}

/// Classifies every bid and the response it received.
///
/// A bid is a question, an explicit invitation, or a shared link with
/// surrounding context. The first reply from another participant within the
/// reply window turns toward when it is substantive and not a stock
/// dismissal; a dismissive, trivial or absent reply turns away.
pub fn bid_response_stats(messages: &[UnifiedMessage], settings: &PatternSettings) -> BidStats {
    let window_ms = settings.bid_reply_window_hours * 3_600_000;
    let mut total_bids = 0u32;
    let mut turning_toward = 0u32;
    let mut bids_by_person: HashMap<String, u32> = HashMap::new();
    let mut toward_by_responder: HashMap<String, u32> = HashMap::new();

    for (index, message) in messages.iter().enumerate() {
        if !is_bid(message) {
            continue;
        }
        total_bids += 1;
        *bids_by_person.entry(message.sender.clone()).or_insert(0) += 1;

        let reply = messages[index + 1..]
            .iter()
            .take_while(|m| m.timestamp_ms - message.timestamp_ms <= window_ms)
            .find(|m| m.sender != message.sender);
        if let Some(reply) = reply {
            if turns_toward(reply) {
                turning_toward += 1;
                *toward_by_responder.entry(reply.sender.clone()).or_insert(0) += 1;
            }
        }
    }

    let turning_away = total_bids - turning_toward;
    let toward_rate = if (total_bids as usize) < settings.bid_min_bids {
        None
    } else {
        Some(f64::from(turning_toward) / f64::from(total_bids))
    };
    BidStats {
        total_bids,
        turning_toward,
        turning_away,
        bids_by_person,
        toward_by_responder,
        toward_rate,
    }
}

fn is_bid(message: &UnifiedMessage) -> bool {
    let Some(text) = message.text() else {
        // A bare link share with no caption is noise, not a bid.
        return false;
    };
    if text.contains('?') {
        return true;
    }
    let lowered = text.to_lowercase();
    if INVITATION_MARKERS.iter().any(|m| lowered.contains(m)) {
        return true;
    }
    message.has_link && text.split_whitespace().count() >= 3
}

fn turns_toward(reply: &UnifiedMessage) -> bool {
    let Some(text) = reply.text() else {
        // Media-only replies still engage.
        return reply.has_media;
    };
    let lowered = text.to_lowercase();
    if DISMISSIVE_REPLIES.iter().any(|d| lowered.contains(d)) {
        return false;
    }
    let words = text.split_whitespace().count();
    words >= MIN_SUBSTANTIVE_WORDS || text.chars().count() >= MIN_SUBSTANTIVE_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;

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
    fn question_answered_substantively_turns_toward() {
        let messages = vec![
            msg("a", 0, "how was the interview?"),
            msg("b", 10 * 60_000, "went really well, they want a second round"),
        ];
        let stats = bid_response_stats(&messages, &PatternSettings::default());
        assert_eq!(stats.total_bids, 1);
        assert_eq!(stats.turning_toward, 1);
        assert_eq!(stats.toward_by_responder["b"], 1);
    }

    #[test]
    fn trivial_or_late_replies_turn_away() {
        let messages = vec![
            msg("a", 0, "want to grab dinner?"),
            msg("b", 10 * 60_000, "k"),
            msg("a", HOUR_MS, "should we try the new place?"),
            msg("b", HOUR_MS + 6 * HOUR_MS, "sounds good, let me check my week"),
        ];
        let stats = bid_response_stats(&messages, &PatternSettings::default());
        assert_eq!(stats.total_bids, 2);
        assert_eq!(stats.turning_toward, 0);
    }

    #[test]
    fn dismissive_stock_phrase_turns_away_despite_length() {
        let messages = vec![
            msg("a", 0, "come over tonight?"),
            msg("b", 60_000, "whatever you say honestly"),
        ];
        let stats = bid_response_stats(&messages, &PatternSettings::default());
        assert_eq!(stats.turning_toward, 0);
    }

    #[test]
    fn rate_requires_minimum_bids() {
        let messages = vec![
            msg("a", 0, "lunch?"),
            msg("b", 60_000, "yes please, thinking ramen"),
        ];
        let stats = bid_response_stats(&messages, &PatternSettings::default());
        assert!(stats.toward_rate.is_none());
    }

    #[test]
    fn link_with_context_is_a_bid() {
        let mut link = msg("a", 0, "this article reminded me of you");
        link.has_link = true;
        let stats = bid_response_stats(&[link], &PatternSettings::default());
        assert_eq!(stats.total_bids, 1);
    }
}
