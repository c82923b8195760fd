//! Per-person running totals, built in one forward pass over the sanitized
//! message stream and frozen into immutable summaries at the end.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::text::{bigrams, extract_emoji, is_stop_word};

const TOP_WORDS: usize = 10;
const TOP_PHRASES: usize = 10;
const TOP_EMOJI: usize = 5;
const MIN_TOP_WORD_LEN: usize = 3;

/// One entry of a frequency table in a finalized summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u32,
}

/// Longest/shortest message captured with enough context to display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtremalMessage {
    pub preview: String,
    pub word_count: u32,
    pub timestamp_ms: i64,
}

const PREVIEW_CHARS: usize = 160;

/// Mutable per-participant state. Created empty at pipeline start, owned by
/// a single analysis invocation, finalized exactly once.
#[derive(Debug, Default)]
pub struct PersonAccumulator {
    pub message_count: u32,
    pub text_message_count: u32,
    pub word_count: u64,
    pub char_count: u64,
    pub emoji_count: u32,
    pub question_count: u32,
    pub media_count: u32,
    pub link_count: u32,
    pub unsent_count: u32,
    pub reactions_given: u32,
    pub reactions_received: u32,
    word_freq: HashMap<String, u32>,
    phrase_freq: HashMap<String, u32>,
    emoji_freq: HashMap<String, u32>,
    vocabulary: HashSet<String>,
    longest: Option<(String, u32, i64)>,
    shortest: Option<(String, u32, i64)>,
}

impl PersonAccumulator {
    /// Folds one of this person's own messages into the totals.
    /// `tokens` is the shared pre-tokenized body for this message.
    pub fn record_message(
        &mut self,
        text: Option<&str>,
        tokens: &[String],
        timestamp_ms: i64,
        has_media: bool,
        has_link: bool,
        is_unsent: bool,
    ) {
        self.message_count += 1;
        if has_media {
            self.media_count += 1;
        }
        if has_link {
            self.link_count += 1;
        }
        if is_unsent {
            self.unsent_count += 1;
            return;
        }
        let Some(text) = text else {
            return;
        };
        self.text_message_count += 1;
        self.word_count += tokens.len() as u64;
        self.char_count += text.chars().count() as u64;
        if text.contains('?') {
            self.question_count += 1;
        }

        for emoji in extract_emoji(text) {
            self.emoji_count += 1;
            *self.emoji_freq.entry(emoji).or_insert(0) += 1;
        }
        for token in tokens {
            self.vocabulary.insert(token.clone());
            if token.chars().count() >= MIN_TOP_WORD_LEN && !is_stop_word(token) {
                *self.word_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }
        for phrase in bigrams(tokens) {
            *self.phrase_freq.entry(phrase).or_insert(0) += 1;
        }

        let words = tokens.len() as u32;
        if words == 0 {
            return;
        }
        if self.longest.as_ref().map_or(true, |(_, w, _)| words > *w) {
            self.longest = Some((preview(text), words, timestamp_ms));
        }
        if self.shortest.as_ref().map_or(true, |(_, w, _)| words < *w) {
            self.shortest = Some((preview(text), words, timestamp_ms));
        }
    }

    pub fn record_reaction_given(&mut self) {
        self.reactions_given += 1;
    }

    pub fn record_reaction_received(&mut self) {
        self.reactions_received += 1;
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Freezes the running state into an immutable summary.
    pub fn finalize(self, participant_id: &str, conversation_messages: u32) -> PersonSummary {
        let message_ratio = if conversation_messages == 0 {
            0.0
        } else {
            f64::from(self.message_count) / f64::from(conversation_messages)
        };
        let avg_words_per_message = if self.text_message_count == 0 {
            None
        } else {
            Some(self.word_count as f64 / f64::from(self.text_message_count))
        };
        let reactions_received_per_message = if self.message_count == 0 {
            None
        } else {
            Some(f64::from(self.reactions_received) / f64::from(self.message_count))
        };
        PersonSummary {
            participant_id: participant_id.to_string(),
            message_count: self.message_count,
            message_ratio,
            word_count: self.word_count,
            char_count: self.char_count,
            avg_words_per_message,
            emoji_count: self.emoji_count,
            distinct_emoji_count: self.emoji_freq.len() as u32,
            question_count: self.question_count,
            question_ratio: ratio(self.question_count, self.text_message_count),
            media_count: self.media_count,
            media_ratio: ratio(self.media_count, self.message_count),
            link_count: self.link_count,
            unsent_count: self.unsent_count,
            reactions_given: self.reactions_given,
            reactions_received: self.reactions_received,
            reactions_received_per_message,
            vocabulary_size: self.vocabulary.len() as u32,
            top_words: top_entries(self.word_freq, TOP_WORDS),
            top_phrases: top_entries(
                self.phrase_freq
                    .into_iter()
                    .filter(|(_, count)| *count >= 2)
                    .collect(),
                TOP_PHRASES,
            ),
            top_emoji: top_entries(self.emoji_freq, TOP_EMOJI),
            longest_message: self.longest.map(extremal),
            shortest_message: self.shortest.map(extremal),
        }
    }
}

/// Immutable per-person output block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub participant_id: String,
    pub message_count: u32,
    pub message_ratio: f64,
    pub word_count: u64,
    pub char_count: u64,
    pub avg_words_per_message: Option<f64>,
    pub emoji_count: u32,
    pub distinct_emoji_count: u32,
    pub question_count: u32,
    pub question_ratio: Option<f64>,
    pub media_count: u32,
    pub media_ratio: Option<f64>,
    pub link_count: u32,
    pub unsent_count: u32,
    pub reactions_given: u32,
    pub reactions_received: u32,
    pub reactions_received_per_message: Option<f64>,
    pub vocabulary_size: u32,
    pub top_words: Vec<FrequencyEntry>,
    pub top_phrases: Vec<FrequencyEntry>,
    pub top_emoji: Vec<FrequencyEntry>,
    pub longest_message: Option<ExtremalMessage>,
    pub shortest_message: Option<ExtremalMessage>,
}

fn ratio(part: u32, whole: u32) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(f64::from(part) / f64::from(whole))
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

fn extremal((preview, word_count, timestamp_ms): (String, u32, i64)) -> ExtremalMessage {
    ExtremalMessage {
        preview,
        word_count,
        timestamp_ms,
    }
}

fn top_entries(freq: HashMap<String, u32>, limit: usize) -> Vec<FrequencyEntry> {
    let mut entries: Vec<(String, u32)> = freq.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
        .into_iter()
        .map(|(value, count)| FrequencyEntry { value, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    fn record(acc: &mut PersonAccumulator, text: &str, ts: i64) {
        let tokens = tokenize(text);
        acc.record_message(Some(text), &tokens, ts, false, false, false);
    }

    #[test]
    fn counts_words_questions_and_extremals() {
        let mut acc = PersonAccumulator::default();
        record(&mut acc, "are you coming tonight?", 1_000);
        record(&mut acc, "ok", 2_000);
        record(&mut acc, "the plan is dinner then the late movie downtown", 3_000);

        assert_eq!(acc.message_count, 3);
        assert_eq!(acc.question_count, 1);
        let summary = acc.finalize("a", 6);
        assert!((summary.message_ratio - 0.5).abs() < 1e-9);
        assert_eq!(summary.longest_message.unwrap().word_count, 9);
        assert_eq!(summary.shortest_message.unwrap().preview, "ok");
    }

    #[test]
    fn unsent_messages_count_but_carry_no_text_signal() {
        let mut acc = PersonAccumulator::default();
        acc.record_message(Some("deleted"), &tokenize("deleted"), 1, false, false, true);
        assert_eq!(acc.message_count, 1);
        assert_eq!(acc.unsent_count, 1);
        assert_eq!(acc.word_count, 0);
        assert_eq!(acc.vocabulary_size(), 0);
    }

    #[test]
    fn multi_codepoint_emoji_count_once() {
        let mut acc = PersonAccumulator::default();
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        let text = format!("look {family}");
        record(&mut acc, &text, 1);
        assert_eq!(acc.emoji_count, 1);
    }

    #[test]
    fn zero_denominators_resolve_to_none() {
        let acc = PersonAccumulator::default();
        let summary = acc.finalize("a", 0);
        assert_eq!(summary.message_ratio, 0.0);
        assert!(summary.avg_words_per_message.is_none());
        assert!(summary.reactions_received_per_message.is_none());
    }

    #[test]
    fn top_words_skip_stop_words_and_rank_by_count() {
        let mut acc = PersonAccumulator::default();
        record(&mut acc, "coffee coffee coffee and tea", 1);
        record(&mut acc, "tea again", 2);
        let summary = acc.finalize("a", 3);
        assert_eq!(summary.top_words[0].value, "coffee");
        assert_eq!(summary.top_words[0].count, 3);
        assert!(summary.top_words.iter().all(|e| e.value != "and"));
    }
}
