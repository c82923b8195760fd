use serde::Serialize;
use uuid::Uuid;

use crate::config::PatternSettings;
use crate::model::UnifiedMessage;
use crate::stats;
use crate::timing::ResponseSample;

/// Independent signals that can raise a conflict event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSignal {
    /// Message length spiking against the local rolling average.
    Escalation,
    /// Multi-day silence right after an intensive exchange.
    ColdSilence,
    /// Accusatory phrase hits.
    HeatedLanguage,
}

/// One detected conflict, after deduplication.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEvent {
    pub event_id: Uuid,
    pub signals: Vec<ConflictSignal>,
    pub start_ms: i64,
    pub end_ms: i64,
    /// Index of the anchoring message in the sanitized stream.
    pub anchor_index: usize,
    pub trigger_preview: Option<String>,
}

/// Accusatory phrasings that flag likely-conflict language.
const ACCUSATORY_PHRASES: &[&str] = &[
    "you always",
    "you never",
    "your fault",
    "you lied",
    "you're lying",
    "how could you",
    "i can't believe you",
    "i cant believe you",
    "are you serious",
    "you don't care",
    "you dont care",
    "i'm done",
    "im done",
    "leave me alone",
    "stop texting me",
    "don't talk to me",
    "dont talk to me",
    "i hate you",
    "shut up",
    "screw you",
];

/// Floor on spike length so two-word replies against a terse baseline do not
/// register as escalation.
const MIN_SPIKE_CHARS: usize = 60;
/// Messages inside the hour before a gap that mark the exchange intensive.
const INTENSIVE_WINDOW_MESSAGES: usize = 8;
const PREVIEW_CHARS: usize = 120;

/// Runs the three signal scans and merges events that land within the
/// configured dedup window of each other.
pub fn detect_conflicts(
    messages: &[UnifiedMessage],
    settings: &PatternSettings,
) -> Vec<ConflictEvent> {
    let mut events = Vec::new();
    events.extend(escalation_events(messages, settings));
    events.extend(cold_silence_events(messages, settings));
    events.extend(heated_language_events(messages, settings));
    events.sort_by_key(|e| e.start_ms);

    let dedup_ms = settings.conflict_dedup_hours * 3_600_000;
    let mut merged: Vec<ConflictEvent> = Vec::new();
    for event in events {
        let absorb = merged
            .last()
            .map_or(false, |prev| event.start_ms - prev.end_ms <= dedup_ms);
        if absorb {
            let prev = merged.last_mut().unwrap();
            prev.end_ms = prev.end_ms.max(event.end_ms);
            for signal in event.signals {
                if !prev.signals.contains(&signal) {
                    prev.signals.push(signal);
                }
            }
            if prev.trigger_preview.is_none() {
                prev.trigger_preview = event.trigger_preview;
            }
        } else {
            merged.push(event);
        }
    }
    merged
}

fn escalation_events(
    messages: &[UnifiedMessage],
    settings: &PatternSettings,
) -> Vec<ConflictEvent> {
    let lengths: Vec<Option<usize>> = messages
        .iter()
        .map(|m| m.text().map(|t| t.chars().count()))
        .collect();

    let mut spiky: Vec<usize> = Vec::new();
    let mut recent: Vec<usize> = Vec::new();
    for (index, length) in lengths.iter().enumerate() {
        let Some(length) = *length else {
            continue;
        };
        if recent.len() >= settings.conflict_rolling_messages {
            let baseline: Vec<f64> = recent.iter().map(|l| *l as f64).collect();
            if let Some(mean) = stats::mean(&baseline) {
                if length >= MIN_SPIKE_CHARS
                    && (length as f64) >= settings.conflict_spike_factor * mean
                {
                    spiky.push(index);
                }
            }
            recent.remove(0);
        }
        recent.push(length);
    }

    // Two or more spikes inside one escalation window form an event.
    let window_ms = settings.conflict_window_mins * 60_000;
    let mut events = Vec::new();
    let mut group: Vec<usize> = Vec::new();
    for index in spiky {
        let belongs = group.last().map_or(false, |prev| {
            messages[index].timestamp_ms - messages[*prev].timestamp_ms <= window_ms
        });
        if !belongs {
            if group.len() >= 2 {
                events.push(escalation_event(messages, &group));
            }
            group.clear();
        }
        group.push(index);
    }
    if group.len() >= 2 {
        events.push(escalation_event(messages, &group));
    }
    events
}

fn escalation_event(messages: &[UnifiedMessage], group: &[usize]) -> ConflictEvent {
    let first = group[0];
    let last = group[group.len() - 1];
    ConflictEvent {
        event_id: Uuid::new_v4(),
        signals: vec![ConflictSignal::Escalation],
        start_ms: messages[first].timestamp_ms,
        end_ms: messages[last].timestamp_ms,
        anchor_index: first,
        trigger_preview: messages[first].text().map(preview),
    }
}

fn cold_silence_events(
    messages: &[UnifiedMessage],
    settings: &PatternSettings,
) -> Vec<ConflictEvent> {
    let silence_ms = settings.cold_silence_days * 86_400_000;
    let mut events = Vec::new();
    for index in 1..messages.len() {
        let gap = messages[index].timestamp_ms - messages[index - 1].timestamp_ms;
        if gap < silence_ms {
            continue;
        }
        let gap_start = messages[index - 1].timestamp_ms;
        let intensive = messages[..index]
            .iter()
            .rev()
            .take_while(|m| gap_start - m.timestamp_ms <= 3_600_000)
            .count()
            >= INTENSIVE_WINDOW_MESSAGES;
        if intensive {
            events.push(ConflictEvent {
                event_id: Uuid::new_v4(),
                signals: vec![ConflictSignal::ColdSilence],
                start_ms: gap_start,
                end_ms: messages[index].timestamp_ms,
                anchor_index: index - 1,
                trigger_preview: messages[index - 1].text().map(preview),
            });
        }
    }
    events
}

fn heated_language_events(
    messages: &[UnifiedMessage],
    settings: &PatternSettings,
) -> Vec<ConflictEvent> {
    let window_ms = settings.conflict_window_mins * 60_000;
    let mut events: Vec<ConflictEvent> = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        let Some(text) = message.text() else {
            continue;
        };
        let lowered = text.to_lowercase();
        if !ACCUSATORY_PHRASES.iter().any(|p| lowered.contains(p)) {
            continue;
        }
        let absorb = events
            .last()
            .map_or(false, |prev| message.timestamp_ms - prev.end_ms <= window_ms);
        if absorb {
            let prev = events.last_mut().unwrap();
            prev.end_ms = message.timestamp_ms;
        } else {
            events.push(ConflictEvent {
                event_id: Uuid::new_v4(),
                signals: vec![ConflictSignal::HeatedLanguage],
                start_ms: message.timestamp_ms,
                end_ms: message.timestamp_ms,
                anchor_index: index,
                trigger_preview: Some(preview(text)),
            });
        }
    }
    events
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

/// How a person ramps a conflict up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStyle {
    Direct,
    PassiveAggressive,
    Withdrawal,
    Mixed,
}

/// How a person climbs back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeescalationStyle {
    Apologize,
    Deflect,
    Ghost,
    TopicChange,
    Humor,
}

/// Style classification for one participant across all detected conflicts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictFingerprint {
    pub participant_id: String,
    pub escalation_style: EscalationStyle,
    pub deescalation_style: DeescalationStyle,
    pub conflicts_considered: u32,
}

const PASSIVE_MARKERS: &[&str] = &[
    "fine.",
    "whatever",
    "sure.",
    "ok then",
    "okay then",
    "nevermind",
    "never mind",
    "forget it",
    "do what you want",
    "if that's what you think",
    "good for you",
];
const APOLOGY_MARKERS: &[&str] = &["sorry", "my bad", "i apologize", "apologies", "forgive me"];
const HUMOR_MARKERS: &[&str] = &["haha", "lol", "lmao", "😂", "🤣", "jk", "just kidding"];
const DEFLECT_MARKERS: &[&str] = &[
    "doesn't matter",
    "doesnt matter",
    "let's not",
    "lets not",
    "drop it",
    "not a big deal",
    "can we not",
    "moving on",
];
const TOPIC_CHANGE_MARKERS: &[&str] = &["anyway", "btw", "by the way", "speaking of", "oh and"];

/// Share of window messages below which a side is escalating by withdrawing.
const LOW_PARTICIPATION: f64 = 0.25;
/// Response-time inflation versus the personal baseline that votes withdrawal.
const WITHDRAWN_RESPONSE_FACTOR: f64 = 2.0;

/// Classifies each side's conflict style across the detected events.
/// `None` below the configured conflict minimum, never a guess from one or
/// two data points.
pub fn fingerprint_conflicts(
    messages: &[UnifiedMessage],
    events: &[ConflictEvent],
    samples: &[ResponseSample],
    pair: (&str, &str),
    settings: &PatternSettings,
) -> Option<Vec<ConflictFingerprint>> {
    if events.len() < settings.fingerprint_min_conflicts {
        return None;
    }
    Some(
        [pair.0, pair.1]
            .iter()
            .map(|id| fingerprint_person(id, messages, events, samples, settings))
            .collect(),
    )
}

fn fingerprint_person(
    participant_id: &str,
    messages: &[UnifiedMessage],
    events: &[ConflictEvent],
    samples: &[ResponseSample],
    settings: &PatternSettings,
) -> ConflictFingerprint {
    let mut baseline: Vec<f64> = samples
        .iter()
        .filter(|s| s.responder == participant_id)
        .map(|s| s.response_secs)
        .collect();
    baseline.sort_by(f64::total_cmp);
    let baseline_median = stats::median(&baseline);

    let mut direct = 0u32;
    let mut passive = 0u32;
    let mut withdrawal = 0u32;
    let mut apologize = 0u32;
    let mut deflect = 0u32;
    let mut ghost = 0u32;
    let mut topic_change = 0u32;
    let mut humor = 0u32;

    for event in events {
        let window = settings.fingerprint_window_messages;
        let start = event.anchor_index.saturating_sub(window);
        let end = (event.anchor_index + window).min(messages.len().saturating_sub(1));
        let slice = &messages[start..=end];

        let own: Vec<&UnifiedMessage> = slice
            .iter()
            .filter(|m| m.sender == participant_id)
            .collect();
        let own_share = if slice.is_empty() {
            0.0
        } else {
            own.len() as f64 / slice.len() as f64
        };

        let mut direct_hits = 0u32;
        let mut passive_hits = 0u32;
        for message in &own {
            let Some(text) = message.text() else { continue };
            let lowered = text.to_lowercase();
            if ACCUSATORY_PHRASES.iter().any(|p| lowered.contains(p))
                || text.matches('!').count() >= 2
            {
                direct_hits += 1;
            }
            if PASSIVE_MARKERS.iter().any(|p| lowered.contains(p)) {
                passive_hits += 1;
            }
        }

        let window_start_ms = messages[start].timestamp_ms;
        let window_end_ms = messages[end].timestamp_ms;
        let mut in_window: Vec<f64> = samples
            .iter()
            .filter(|s| {
                s.responder == participant_id
                    && s.responded_at_ms >= window_start_ms
                    && s.responded_at_ms <= window_end_ms
            })
            .map(|s| s.response_secs)
            .collect();
        in_window.sort_by(f64::total_cmp);
        let slowed = match (baseline_median, stats::median(&in_window)) {
            (Some(base), Some(local)) if base > 0.0 => {
                local >= WITHDRAWN_RESPONSE_FACTOR * base
            }
            _ => false,
        };

        if direct_hits > 0 && direct_hits >= passive_hits {
            direct += 1;
        } else if passive_hits > 0 {
            passive += 1;
        } else if slowed || own_share < LOW_PARTICIPATION {
            withdrawal += 1;
        }

        // De-escalation reads only the messages after the anchor.
        let after: Vec<&UnifiedMessage> = slice
            .iter()
            .filter(|m| {
                m.sender == participant_id && m.timestamp_ms > messages[event.anchor_index].timestamp_ms
            })
            .collect();
        if after.is_empty() {
            ghost += 1;
            continue;
        }
        let mut event_votes = [0u32; 4]; // apologize, humor, deflect, topic-change
        for message in &after {
            let Some(text) = message.text() else { continue };
            let lowered = text.to_lowercase();
            if APOLOGY_MARKERS.iter().any(|p| lowered.contains(p)) {
                event_votes[0] += 1;
            }
            if HUMOR_MARKERS.iter().any(|p| lowered.contains(p)) {
                event_votes[1] += 1;
            }
            if DEFLECT_MARKERS.iter().any(|p| lowered.contains(p)) {
                event_votes[2] += 1;
            }
            if TOPIC_CHANGE_MARKERS.iter().any(|p| lowered.contains(p)) {
                event_votes[3] += 1;
            }
        }
        match event_votes.iter().copied().enumerate().max_by_key(|(_, v)| *v) {
            Some((_, 0)) => topic_change += 1, // answered but never acknowledged
            Some((0, _)) => apologize += 1,
            Some((1, _)) => humor += 1,
            Some((2, _)) => deflect += 1,
            _ => topic_change += 1,
        }
    }

    ConflictFingerprint {
        participant_id: participant_id.to_string(),
        escalation_style: pick_escalation(direct, passive, withdrawal),
        deescalation_style: pick_deescalation(apologize, humor, deflect, topic_change, ghost),
        conflicts_considered: events.len() as u32,
    }
}

fn pick_escalation(direct: u32, passive: u32, withdrawal: u32) -> EscalationStyle {
    let top = direct.max(passive).max(withdrawal);
    if top == 0 {
        return EscalationStyle::Mixed;
    }
    let leaders = [direct, passive, withdrawal]
        .iter()
        .filter(|v| **v == top)
        .count();
    if leaders > 1 {
        return EscalationStyle::Mixed;
    }
    if direct == top {
        EscalationStyle::Direct
    } else if passive == top {
        EscalationStyle::PassiveAggressive
    } else {
        EscalationStyle::Withdrawal
    }
}

fn pick_deescalation(
    apologize: u32,
    humor: u32,
    deflect: u32,
    topic_change: u32,
    ghost: u32,
) -> DeescalationStyle {
    let ranked = [
        (apologize, DeescalationStyle::Apologize),
        (humor, DeescalationStyle::Humor),
        (deflect, DeescalationStyle::Deflect),
        (topic_change, DeescalationStyle::TopicChange),
        (ghost, DeescalationStyle::Ghost),
    ];
    ranked
        .iter()
        .max_by_key(|(votes, _)| *votes)
        .map(|(_, style)| *style)
        .unwrap_or(DeescalationStyle::TopicChange)
}
