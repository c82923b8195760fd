use chrono::{TimeZone, Utc};
use serde::Serialize;

use super::{month_index, TurnSequence};
use crate::config::TimingSettings;
use crate::stats;

/// One measured response: `responder` answered `prompter` after
/// `response_secs`, timed first-message-to-first-message between turns.
#[derive(Debug, Clone)]
pub struct ResponseSample {
    pub responder: String,
    pub prompter: String,
    pub response_secs: f64,
    pub responded_at_ms: i64,
    /// Index of the replying turn in the shared turn sequence.
    pub turn_index: usize,
}

/// Direction of the monthly response-time trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Faster,
    Slower,
    Stable,
}

/// Response-time distribution for one participant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeStats {
    pub participant_id: String,
    pub sample_count: u32,
    pub outliers_excluded: u32,
    pub median_secs: Option<f64>,
    pub trimmed_mean_secs: Option<f64>,
    pub p75_secs: Option<f64>,
    pub p90_secs: Option<f64>,
    pub p95_secs: Option<f64>,
    pub fastest_secs_raw: Option<f64>,
    pub slowest_secs_raw: Option<f64>,
    pub fastest_secs_filtered: Option<f64>,
    pub slowest_secs_filtered: Option<f64>,
    /// OLS slope of monthly median response time, seconds per month.
    pub trend_slope_secs_per_month: Option<f64>,
    pub trend_direction: Option<TrendDirection>,
}

/// Walks the turn sequence and emits one sample per sender change.
pub fn extract_response_samples(sequence: &TurnSequence) -> Vec<ResponseSample> {
    sequence
        .turns
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].sender != pair[1].sender)
        .map(|(index, pair)| ResponseSample {
            responder: pair[1].sender.clone(),
            prompter: pair[0].sender.clone(),
            response_secs: (pair[1].start_ms - pair[0].start_ms) as f64 / 1000.0,
            responded_at_ms: pair[1].start_ms,
            turn_index: index + 1,
        })
        .collect()
}

const TRIM_FRACTION: f64 = 0.1;
const STABLE_SLOPE_SECS: f64 = 1.0;

/// Distribution statistics for one person's samples, IQR-filtered before the
/// central estimates; raw extremes are reported alongside filtered ones.
pub fn response_time_stats(
    participant_id: &str,
    samples: &[ResponseSample],
    settings: &TimingSettings,
) -> ResponseTimeStats {
    let mut own: Vec<f64> = samples
        .iter()
        .filter(|s| s.responder == participant_id)
        .map(|s| s.response_secs)
        .collect();
    own.sort_by(f64::total_cmp);

    let filtered = stats::iqr_filter(&own, settings.iqr_multiplier);
    let outliers_excluded = (own.len() - filtered.len()) as u32;

    let trend = monthly_trend(participant_id, samples, settings);
    ResponseTimeStats {
        participant_id: participant_id.to_string(),
        sample_count: own.len() as u32,
        outliers_excluded,
        median_secs: stats::median(&filtered),
        trimmed_mean_secs: stats::trimmed_mean(&filtered, TRIM_FRACTION),
        p75_secs: stats::percentile(&filtered, 75.0),
        p90_secs: stats::percentile(&filtered, 90.0),
        p95_secs: stats::percentile(&filtered, 95.0),
        fastest_secs_raw: own.first().copied(),
        slowest_secs_raw: own.last().copied(),
        fastest_secs_filtered: filtered.first().copied(),
        slowest_secs_filtered: filtered.last().copied(),
        trend_slope_secs_per_month: trend,
        trend_direction: trend.map(direction),
    }
}

fn direction(slope: f64) -> TrendDirection {
    if slope > STABLE_SLOPE_SECS {
        TrendDirection::Slower
    } else if slope < -STABLE_SLOPE_SECS {
        TrendDirection::Faster
    } else {
        TrendDirection::Stable
    }
}

/// Monthly median response time regressed against month index; `None` below
/// the configured month minimum.
fn monthly_trend(
    participant_id: &str,
    samples: &[ResponseSample],
    settings: &TimingSettings,
) -> Option<f64> {
    let mut by_month: std::collections::BTreeMap<i32, Vec<f64>> = std::collections::BTreeMap::new();
    for sample in samples.iter().filter(|s| s.responder == participant_id) {
        let instant = Utc.timestamp_millis_opt(sample.responded_at_ms).single()?;
        by_month
            .entry(month_index(instant))
            .or_default()
            .push(sample.response_secs);
    }
    if by_month.len() < settings.trend_min_months {
        return None;
    }
    let points: Vec<(f64, f64)> = by_month
        .into_iter()
        .filter_map(|(month, mut values)| {
            values.sort_by(f64::total_cmp);
            stats::median(&values).map(|m| (f64::from(month), m))
        })
        .collect();
    stats::ols_slope(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnifiedMessage;
    use crate::timing::build_turns;

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
    fn response_measured_from_first_message_of_unanswered_turn() {
        // a sends two quick messages, b answers the run.
        let messages = vec![msg("a", 0), msg("a", 60_000), msg("b", 300_000)];
        let turns = build_turns(&messages, 120);
        let samples = extract_response_samples(&turns);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].responder, "b");
        assert!((samples[0].response_secs - 300.0).abs() < 1e-9);
    }

    #[test]
    fn stats_filter_outliers_but_keep_raw_extremes() {
        let mut messages = Vec::new();
        let mut ts = 0i64;
        // Alternating turns with ~60s responses, one pathological 3-day gap.
        for round in 0..20 {
            messages.push(msg("a", ts));
            let gap = if round == 10 { 3 * 24 * 3600 * 1000 } else { 60_000 };
            ts += gap;
            messages.push(msg("b", ts));
            ts += 60_000;
        }
        let turns = build_turns(&messages, 30);
        let samples = extract_response_samples(&turns);
        let stats = response_time_stats("b", &samples, &TimingSettings::default());
        assert_eq!(stats.sample_count, 20);
        assert!(stats.outliers_excluded >= 1);
        assert!((stats.median_secs.unwrap() - 60.0).abs() < 1.0);
        assert!(stats.slowest_secs_raw.unwrap() > stats.slowest_secs_filtered.unwrap());
    }

    #[test]
    fn trend_requires_minimum_months() {
        let messages = vec![msg("a", 0), msg("b", 60_000)];
        let turns = build_turns(&messages, 120);
        let samples = extract_response_samples(&turns);
        let stats = response_time_stats("b", &samples, &TimingSettings::default());
        assert!(stats.trend_slope_secs_per_month.is_none());
        assert!(stats.trend_direction.is_none());
    }
}
