use serde::Serialize;

/// One weighted component of a composite index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScore {
    pub name: String,
    pub weight: f64,
    /// 0-100, `None` when the underlying metric was unavailable.
    pub value: Option<f64>,
}

/// A composite index with its full breakdown. The overall value is `None`
/// when less than half the component weight could be computed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub overall: Option<f64>,
    pub components: Vec<ComponentScore>,
}

/// Everything the synthesizer needs, pulled from the earlier stages.
#[derive(Debug, Clone, Default)]
pub struct CompositeInputs {
    /// 0-100, 50 means both sides send equally.
    pub message_balance: Option<f64>,
    pub reciprocity_overall: Option<f64>,
    pub median_response_secs: Option<f64>,
    pub p90_response_secs: Option<f64>,
    pub overall_sentiment: Option<f64>,
    pub mean_volatility: Option<f64>,
    pub sentiment_trend_slope: Option<f64>,
    pub toward_rate: Option<f64>,
    pub conflicts_per_month: Option<f64>,
    pub cold_silence_count: u32,
    pub pursuit_cycles: u32,
    pub messages_per_day: Option<f64>,
    pub emoji_per_message: Option<f64>,
    pub burst_count: u32,
    pub span_days: u32,
}

const MIN_COMPONENT_WEIGHT: f64 = 0.5;

fn combine(components: Vec<ComponentScore>) -> CompositeScore {
    let available: f64 = components
        .iter()
        .filter(|c| c.value.is_some())
        .map(|c| c.weight)
        .sum();
    let overall = if available < MIN_COMPONENT_WEIGHT {
        None
    } else {
        Some(
            components
                .iter()
                .filter_map(|c| c.value.map(|v| v * c.weight / available))
                .sum::<f64>()
                .clamp(0.0, 100.0),
        )
    };
    CompositeScore {
        overall,
        components,
    }
}

fn component(name: &str, weight: f64, value: Option<f64>) -> ComponentScore {
    ComponentScore {
        name: name.to_string(),
        weight,
        value: value.map(|v| v.clamp(0.0, 100.0)),
    }
}

/// Distance-from-even balance mapped so 50/50 scores 100 and total
/// one-sidedness scores 0.
fn symmetry_quality(balance: Option<f64>) -> Option<f64> {
    balance.map(|b| 100.0 - 2.0 * (b - 50.0).abs())
}

/// Relationship health: balance, reciprocity, response stability, emotional
/// safety and trajectory, weighted 0.25/0.20/0.20/0.20/0.15.
pub fn health_score(inputs: &CompositeInputs) -> CompositeScore {
    let stability = match (inputs.median_response_secs, inputs.p90_response_secs) {
        (Some(median), Some(p90)) if p90 > 0.0 => Some((median / p90) * 100.0),
        _ => None,
    };
    let safety = inputs.overall_sentiment.map(|avg| {
        let base = (avg + 1.0) * 50.0;
        let penalty = inputs.mean_volatility.unwrap_or(0.0) * 100.0;
        base - penalty
    });
    let trajectory = inputs
        .sentiment_trend_slope
        .map(|slope| 50.0 + (slope * 400.0).clamp(-50.0, 50.0));

    combine(vec![
        component("balance", 0.25, symmetry_quality(inputs.message_balance)),
        component(
            "reciprocity",
            0.20,
            symmetry_quality(inputs.reciprocity_overall),
        ),
        component("response_stability", 0.20, stability),
        component("emotional_safety", 0.20, safety),
        component("trajectory", 0.15, trajectory),
    ])
}

/// Accumulated damage: conflict frequency, cold silences, pursuit cycles and
/// negative affect. Higher is worse.
pub fn damage_score(inputs: &CompositeInputs) -> CompositeScore {
    let months = (f64::from(inputs.span_days) / 30.0).max(1.0);
    let conflict_load = inputs
        .conflicts_per_month
        .map(|rate| (rate * 25.0).clamp(0.0, 100.0));
    let silence_load = Some((f64::from(inputs.cold_silence_count) / months * 50.0).clamp(0.0, 100.0));
    let pursuit_load = Some((f64::from(inputs.pursuit_cycles) / months * 40.0).clamp(0.0, 100.0));
    let negativity = inputs
        .overall_sentiment
        .map(|avg| ((-avg).max(0.0) * 200.0).clamp(0.0, 100.0));

    combine(vec![
        component("conflict_frequency", 0.35, conflict_load),
        component("cold_silences", 0.20, silence_load),
        component("pursuit_cycles", 0.20, pursuit_load),
        component("negativity", 0.25, negativity),
    ])
}

/// Forward-looking warning meter: declining sentiment, unanswered bids and
/// recent conflict pressure. Higher is worse.
pub fn threat_meter(inputs: &CompositeInputs) -> CompositeScore {
    let decline = inputs
        .sentiment_trend_slope
        .map(|slope| ((-slope) * 800.0).clamp(0.0, 100.0));
    let rejection = inputs.toward_rate.map(|rate| (1.0 - rate) * 100.0);
    let conflict_pressure = inputs
        .conflicts_per_month
        .map(|rate| (rate * 30.0).clamp(0.0, 100.0));

    combine(vec![
        component("sentiment_decline", 0.40, decline),
        component("bid_rejection", 0.30, rejection),
        component("conflict_pressure", 0.30, conflict_pressure),
    ])
}

/// Share-worthiness: raw volume, emoji density and burst drama.
pub fn viral_score(inputs: &CompositeInputs) -> CompositeScore {
    let volume = inputs
        .messages_per_day
        .map(|rate| (rate / 50.0 * 100.0).clamp(0.0, 100.0));
    let emoji = inputs
        .emoji_per_message
        .map(|rate| (rate / 0.8 * 100.0).clamp(0.0, 100.0));
    let drama = Some((f64::from(inputs.burst_count) * 12.5).clamp(0.0, 100.0));

    combine(vec![
        component("volume", 0.40, volume),
        component("emoji_density", 0.30, emoji),
        component("burst_drama", 0.30, drama),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_inputs() -> CompositeInputs {
        CompositeInputs {
            message_balance: Some(50.0),
            reciprocity_overall: Some(50.0),
            median_response_secs: Some(90.0),
            p90_response_secs: Some(300.0),
            overall_sentiment: Some(0.4),
            mean_volatility: Some(0.05),
            sentiment_trend_slope: Some(0.01),
            toward_rate: Some(0.85),
            conflicts_per_month: Some(0.2),
            cold_silence_count: 0,
            pursuit_cycles: 0,
            messages_per_day: Some(35.0),
            emoji_per_message: Some(0.3),
            burst_count: 2,
            span_days: 180,
        }
    }

    #[test]
    fn balanced_warm_conversation_scores_healthy() {
        let health = health_score(&healthy_inputs());
        assert!(health.overall.unwrap() > 60.0);
        assert_eq!(health.components.len(), 5);
        let weights: f64 = health.components.iter().map(|c| c.weight).sum();
        assert!((weights - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lopsided_conversation_drags_health_down() {
        let mut inputs = healthy_inputs();
        inputs.message_balance = Some(92.0);
        inputs.reciprocity_overall = Some(85.0);
        let skewed = health_score(&inputs).overall.unwrap();
        let even = health_score(&healthy_inputs()).overall.unwrap();
        assert!(skewed < even);
    }

    #[test]
    fn missing_majority_of_components_yields_none() {
        let inputs = CompositeInputs::default();
        assert!(health_score(&inputs).overall.is_none());
        // The breakdown still names every component.
        assert_eq!(health_score(&inputs).components.len(), 5);
    }

    #[test]
    fn conflict_heavy_history_raises_damage_and_threat() {
        let mut inputs = healthy_inputs();
        inputs.conflicts_per_month = Some(3.0);
        inputs.cold_silence_count = 4;
        inputs.pursuit_cycles = 5;
        inputs.overall_sentiment = Some(-0.3);
        inputs.sentiment_trend_slope = Some(-0.05);
        inputs.toward_rate = Some(0.2);
        let damage = damage_score(&inputs).overall.unwrap();
        let threat = threat_meter(&inputs).overall.unwrap();
        assert!(damage > 50.0, "damage={damage}");
        assert!(threat > 50.0, "threat={threat}");
    }

    #[test]
    fn viral_score_tracks_volume_and_drama() {
        let quiet = viral_score(&CompositeInputs {
            messages_per_day: Some(2.0),
            emoji_per_message: Some(0.01),
            burst_count: 0,
            ..CompositeInputs::default()
        });
        let loud = viral_score(&healthy_inputs());
        assert!(loud.overall.unwrap() > quiet.overall.unwrap());
    }
}
