use serde::Serialize;

use crate::config::PatternSettings;

const WEIGHT_MESSAGES: f64 = 0.30;
const WEIGHT_INITIATIONS: f64 = 0.25;
const WEIGHT_RESPONSE: f64 = 0.15;
const WEIGHT_REACTIONS: f64 = 0.30;

/// Raw symmetric inputs for one pair, gathered by the pipeline from the
/// accumulator, session and response-time stages.
#[derive(Debug, Clone)]
pub struct ReciprocityInputs {
    pub messages_a: u32,
    pub messages_b: u32,
    pub initiations_a: u32,
    pub initiations_b: u32,
    pub median_response_secs_a: Option<f64>,
    pub median_response_secs_b: Option<f64>,
    pub reactions_given_a: u32,
    pub reactions_given_b: u32,
}

/// Composite 0-100 symmetry index; 50 on every axis means perfect balance,
/// above 50 means participant A carries more of that behavior.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReciprocityIndex {
    pub participant_a: String,
    pub participant_b: String,
    pub overall: f64,
    pub message_balance: Option<f64>,
    pub initiation_balance: Option<f64>,
    /// Min/max ratio of median response times, signed around 50: above 50
    /// means A answers faster.
    pub response_symmetry: Option<f64>,
    pub reaction_balance: Option<f64>,
}

/// Computes the reciprocity index. `None` below the message minimum or when
/// every sub-score has a degenerate denominator. Weights of unavailable
/// sub-scores are redistributed over the available ones.
pub fn reciprocity_index(
    pair: (&str, &str),
    inputs: &ReciprocityInputs,
    settings: &PatternSettings,
) -> Option<ReciprocityIndex> {
    let total_messages = inputs.messages_a + inputs.messages_b;
    if (total_messages as usize) < settings.reciprocity_min_messages {
        return None;
    }

    let message_balance = share_score(inputs.messages_a, inputs.messages_b);
    let initiation_balance = share_score(inputs.initiations_a, inputs.initiations_b);
    let reaction_balance = share_score(inputs.reactions_given_a, inputs.reactions_given_b);
    let response_symmetry = response_score(
        inputs.median_response_secs_a,
        inputs.median_response_secs_b,
    );

    let components = [
        (message_balance, WEIGHT_MESSAGES),
        (initiation_balance, WEIGHT_INITIATIONS),
        (response_symmetry, WEIGHT_RESPONSE),
        (reaction_balance, WEIGHT_REACTIONS),
    ];
    let available_weight: f64 = components
        .iter()
        .filter(|(score, _)| score.is_some())
        .map(|(_, weight)| weight)
        .sum();
    if available_weight == 0.0 {
        return None;
    }
    let overall = components
        .iter()
        .filter_map(|(score, weight)| score.map(|s| s * weight / available_weight))
        .sum();

    Some(ReciprocityIndex {
        participant_a: pair.0.to_string(),
        participant_b: pair.1.to_string(),
        overall,
        message_balance,
        initiation_balance,
        response_symmetry,
        reaction_balance,
    })
}

/// A's share of a symmetric count pair on the 0-100 scale, 50 = even.
fn share_score(a: u32, b: u32) -> Option<f64> {
    let total = a + b;
    if total == 0 {
        return None;
    }
    Some(f64::from(a) / f64::from(total) * 100.0)
}

/// Signed min/max-ratio score: 50 at identical medians, drifting toward the
/// faster side as the ratio decays.
fn response_score(median_a: Option<f64>, median_b: Option<f64>) -> Option<f64> {
    let (a, b) = (median_a?, median_b?);
    if a <= 0.0 || b <= 0.0 {
        return None;
    }
    let ratio = a.min(b) / a.max(b);
    let deviation = 50.0 * (1.0 - ratio);
    if a < b {
        // A answers faster, carries more of the responsiveness.
        Some(50.0 + deviation)
    } else {
        Some(50.0 - deviation)
    }
}
