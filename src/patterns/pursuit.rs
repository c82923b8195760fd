use std::collections::HashMap;

use serde::Serialize;

use crate::config::PatternSettings;
use crate::model::UnifiedMessage;

/// Explicit demand markers that qualify a short unanswered run as pursuit.
const DEMAND_MARKERS: &[&str] = &[
    "hello?",
    "helloo",
    "hellooo",
    "answer me",
    "reply",
    "respond",
    "are you there",
    "you there",
    "where are you",
    "why aren't you",
    "talk to me",
    "say something",
    "??",
];

/// One completed pursuit-withdrawal cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PursuitCycle {
    pub pursuer: String,
    pub withdrawer: String,
    pub run_start_ms: i64,
    pub run_end_ms: i64,
    pub messages_in_run: u32,
    pub silence_hours: f64,
    pub had_demand_marker: bool,
}

/// Pursuit-withdrawal block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PursuitWithdrawal {
    pub cycle_count: u32,
    pub cycles: Vec<PursuitCycle>,
    pub cycles_by_pursuer: HashMap<String, u32>,
}

/// Detects unanswered-run → long-silence cycles between the analyzed pair.
///
/// A run of `pursuit_run_definite` consecutive messages from one sender is
/// always pursuit; runs of `pursuit_run`..`pursuit_run_definite` only count
/// when they contain an explicit demand marker. Withdrawal completes the
/// cycle when the other side stays silent at least
/// `withdrawal_silence_hours` after the run (including trailing silence at
/// the end of the export).
pub fn detect_pursuit_withdrawal(
    messages: &[UnifiedMessage],
    pair: (&str, &str),
    settings: &PatternSettings,
) -> PursuitWithdrawal {
    let silence_ms = settings.withdrawal_silence_hours * 3_600_000;
    let mut cycles: Vec<PursuitCycle> = Vec::new();

    let mut index = 0usize;
    while index < messages.len() {
        let sender = &messages[index].sender;
        if sender != pair.0 && sender != pair.1 {
            index += 1;
            continue;
        }
        let mut end = index;
        while end + 1 < messages.len() && messages[end + 1].sender == *sender {
            end += 1;
        }
        let run_len = end - index + 1;
        if run_len >= settings.pursuit_run {
            let run = &messages[index..=end];
            let had_demand_marker = run.iter().any(contains_demand_marker);
            let qualifies =
                run_len >= settings.pursuit_run_definite || had_demand_marker;
            if qualifies {
                let run_end_ms = messages[end].timestamp_ms;
                let silence_gap = messages
                    .get(end + 1)
                    .map(|next| next.timestamp_ms - run_end_ms);
                // Trailing silence with no reply at all also withdraws.
                let withdrawn = silence_gap.map_or(true, |gap| gap >= silence_ms);
                if withdrawn {
                    let withdrawer = if *sender == pair.0 { pair.1 } else { pair.0 };
                    cycles.push(PursuitCycle {
                        pursuer: sender.clone(),
                        withdrawer: withdrawer.to_string(),
                        run_start_ms: messages[index].timestamp_ms,
                        run_end_ms,
                        messages_in_run: run_len as u32,
                        silence_hours: silence_gap.map_or(0.0, |gap| gap as f64 / 3_600_000.0),
                        had_demand_marker,
                    });
                }
            }
        }
        index = end + 1;
    }

    let mut cycles_by_pursuer: HashMap<String, u32> = HashMap::new();
    for cycle in &cycles {
        *cycles_by_pursuer.entry(cycle.pursuer.clone()).or_insert(0) += 1;
    }
    PursuitWithdrawal {
        cycle_count: cycles.len() as u32,
        cycles,
        cycles_by_pursuer,
    }
}

fn contains_demand_marker(message: &UnifiedMessage) -> bool {
    let Some(text) = message.text() else {
        return false;
    };
    let lowered = text.to_lowercase();
    DEMAND_MARKERS.iter().any(|marker| lowered.contains(marker))
}
