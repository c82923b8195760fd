use std::collections::HashMap;

use serde::Serialize;

use crate::config::TimingSettings;
use crate::model::UnifiedMessage;

/// Longest silent stretch in the conversation, with the senders on each side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestSilence {
    pub start_ms: i64,
    pub end_ms: i64,
    pub duration_hours: f64,
    pub last_sender_before: String,
    pub first_sender_after: String,
}

/// Session segmentation results: who opens conversations, who closes them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_count: u32,
    pub initiations: HashMap<String, u32>,
    pub endings: HashMap<String, u32>,
    pub avg_messages_per_session: Option<f64>,
    pub longest_silence: Option<LongestSilence>,
}

/// Splits the stream into sessions wherever the gap exceeds the configured
/// silence threshold. The first message after a gap initiates a session; the
/// last message before the next gap ends it.
pub fn detect_sessions(messages: &[UnifiedMessage], settings: &TimingSettings) -> SessionStats {
    let gap_ms = settings.session_gap_hours * 3600 * 1000;
    let mut initiations: HashMap<String, u32> = HashMap::new();
    let mut endings: HashMap<String, u32> = HashMap::new();
    let mut session_count = 0u32;
    let mut longest: Option<LongestSilence> = None;

    if let Some(first) = messages.first() {
        session_count = 1;
        *initiations.entry(first.sender.clone()).or_insert(0) += 1;
    }
    for pair in messages.windows(2) {
        let gap = pair[1].timestamp_ms - pair[0].timestamp_ms;
        if gap > gap_ms {
            session_count += 1;
            *endings.entry(pair[0].sender.clone()).or_insert(0) += 1;
            *initiations.entry(pair[1].sender.clone()).or_insert(0) += 1;
        }
        let is_longest = longest
            .as_ref()
            .map_or(true, |l| gap > l.end_ms - l.start_ms);
        if is_longest {
            longest = Some(LongestSilence {
                start_ms: pair[0].timestamp_ms,
                end_ms: pair[1].timestamp_ms,
                duration_hours: gap as f64 / 3_600_000.0,
                last_sender_before: pair[0].sender.clone(),
                first_sender_after: pair[1].sender.clone(),
            });
        }
    }
    if let Some(last) = messages.last() {
        *endings.entry(last.sender.clone()).or_insert(0) += 1;
    }

    let avg_messages_per_session = if session_count == 0 {
        None
    } else {
        Some(messages.len() as f64 / f64::from(session_count))
    };

    SessionStats {
        session_count,
        initiations,
        endings,
        avg_messages_per_session,
        longest_silence: longest,
    }
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

    const HOUR_MS: i64 = 3600 * 1000;

    #[test]
    fn sessions_split_on_silence_and_attribute_roles() {
        let messages = vec![
            msg("a", 0),
            msg("b", HOUR_MS),
            // 8h silence: b ended the first session, a opens the second.
            msg("a", 9 * HOUR_MS),
            msg("b", 10 * HOUR_MS),
        ];
        let stats = detect_sessions(&messages, &TimingSettings::default());
        assert_eq!(stats.session_count, 2);
        assert_eq!(stats.initiations["a"], 2);
        assert_eq!(stats.endings["b"], 2);
        assert_eq!(stats.avg_messages_per_session, Some(2.0));
    }

    #[test]
    fn longest_silence_records_boundaries_and_senders() {
        let messages = vec![msg("a", 0), msg("b", HOUR_MS), msg("a", 25 * HOUR_MS)];
        let stats = detect_sessions(&messages, &TimingSettings::default());
        let silence = stats.longest_silence.unwrap();
        assert_eq!(silence.start_ms, HOUR_MS);
        assert_eq!(silence.end_ms, 25 * HOUR_MS);
        assert_eq!(silence.last_sender_before, "b");
        assert_eq!(silence.first_sender_after, "a");
        assert!((silence.duration_hours - 24.0).abs() < 1e-9);
    }

    #[test]
    fn empty_conversation_has_no_sessions() {
        let stats = detect_sessions(&[], &TimingSettings::default());
        assert_eq!(stats.session_count, 0);
        assert!(stats.avg_messages_per_session.is_none());
        assert!(stats.longest_silence.is_none());
    }
}
