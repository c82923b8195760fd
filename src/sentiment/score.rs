use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use rayon::prelude::*;
use serde::Serialize;

use super::lexicon::Lexicon;
use crate::config::SentimentSettings;
use crate::model::UnifiedMessage;
use crate::stats;
use crate::text::extract_emoji;
use crate::timing::month_index;

/// Affect score for one message that matched at least one lexicon entry.
#[derive(Debug, Clone)]
pub struct MessageSentiment {
    /// Index into the sanitized message slice.
    pub message_index: usize,
    pub sender: String,
    pub timestamp_ms: i64,
    pub score: f64,
    pub matched_tokens: u32,
}

/// Scores one message: mean of matched-token scores with negation inversion.
/// Messages with zero matches return `None` and stay out of every aggregate.
pub fn score_message(tokens: &[String], text: &str, lexicon: &Lexicon, window: usize) -> Option<(f64, u32)> {
    let mut total = 0.0;
    let mut matched = 0u32;
    for (position, token) in tokens.iter().enumerate() {
        let Some(mut score) = lexicon.score(token) else {
            continue;
        };
        let lookback_start = position.saturating_sub(window);
        let negated = tokens[lookback_start..position]
            .iter()
            .any(|prior| lexicon.is_negation(prior));
        if negated {
            score = -score;
        }
        total += score;
        matched += 1;
    }
    for emoji in extract_emoji(text) {
        if let Some(score) = lexicon.score(&emoji) {
            total += score;
            matched += 1;
        }
    }
    if matched == 0 {
        None
    } else {
        Some((total / f64::from(matched), matched))
    }
}

/// Scores the whole stream on the current rayon pool. Unsent and empty
/// messages never produce a score.
pub fn score_messages(
    messages: &[UnifiedMessage],
    tokens: &[Vec<String>],
    lexicon: &Lexicon,
    settings: &SentimentSettings,
) -> Vec<MessageSentiment> {
    messages
        .par_iter()
        .enumerate()
        .filter_map(|(index, message)| {
            let text = message.text()?;
            let (score, matched) =
                score_message(&tokens[index], text, lexicon, settings.negation_window)?;
            Some(MessageSentiment {
                message_index: index,
                sender: message.sender.clone(),
                timestamp_ms: message.timestamp_ms,
                score,
                matched_tokens: matched,
            })
        })
        .collect()
}

/// Per-person sentiment aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSentiment {
    pub participant_id: String,
    pub scored_messages: u32,
    pub average: Option<f64>,
    /// Count of positive-scoring over negative-scoring messages.
    pub positive_negative_ratio: Option<f64>,
    /// Variance of consecutive message-score deltas.
    pub volatility: Option<f64>,
    pub trend_slope_per_month: Option<f64>,
}

/// One month of the conversation-wide sentiment series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySentiment {
    pub month: String,
    pub average: f64,
    pub scored_messages: u32,
}

/// Sentiment block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub scored_message_count: u32,
    pub overall_average: Option<f64>,
    pub per_person: Vec<PersonSentiment>,
    pub monthly_series: Vec<MonthlySentiment>,
    /// OLS slope of the monthly averages.
    pub trend_slope_per_month: Option<f64>,
}

/// Builds all aggregates from the per-message scores.
pub fn aggregate_sentiment(
    scores: &[MessageSentiment],
    participant_ids: &[String],
    settings: &SentimentSettings,
    trend_min_months: usize,
) -> SentimentReport {
    let per_person = participant_ids
        .iter()
        .map(|id| person_sentiment(id, scores, settings, trend_min_months))
        .collect();

    let all: Vec<f64> = scores.iter().map(|s| s.score).collect();
    let monthly = monthly_series(scores);
    let trend_slope_per_month = if monthly.len() >= trend_min_months {
        let points: Vec<(f64, f64)> = monthly
            .iter()
            .enumerate()
            .map(|(i, m)| (i as f64, m.average))
            .collect();
        stats::ols_slope(&points)
    } else {
        None
    };

    SentimentReport {
        scored_message_count: scores.len() as u32,
        overall_average: stats::mean(&all),
        per_person,
        monthly_series: monthly,
        trend_slope_per_month,
    }
}

fn person_sentiment(
    participant_id: &str,
    scores: &[MessageSentiment],
    settings: &SentimentSettings,
    trend_min_months: usize,
) -> PersonSentiment {
    let own: Vec<&MessageSentiment> = scores
        .iter()
        .filter(|s| s.sender == participant_id)
        .collect();
    let values: Vec<f64> = own.iter().map(|s| s.score).collect();

    let positives = values.iter().filter(|v| **v > 0.0).count();
    let negatives = values.iter().filter(|v| **v < 0.0).count();
    let positive_negative_ratio = if negatives == 0 {
        None
    } else {
        Some(positives as f64 / negatives as f64)
    };

    let volatility = if values.len() >= settings.volatility_min_messages {
        let deltas: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
        stats::variance(&deltas)
    } else {
        None
    };

    let mut by_month: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for sample in &own {
        if let Some(instant) = Utc.timestamp_millis_opt(sample.timestamp_ms).single() {
            by_month
                .entry(month_index(instant))
                .or_default()
                .push(sample.score);
        }
    }
    let trend_slope_per_month = if by_month.len() >= trend_min_months {
        let points: Vec<(f64, f64)> = by_month
            .into_iter()
            .filter_map(|(month, values)| stats::mean(&values).map(|m| (f64::from(month), m)))
            .collect();
        stats::ols_slope(&points)
    } else {
        None
    };

    PersonSentiment {
        participant_id: participant_id.to_string(),
        scored_messages: values.len() as u32,
        average: stats::mean(&values),
        positive_negative_ratio,
        volatility,
        trend_slope_per_month,
    }
}

fn monthly_series(scores: &[MessageSentiment]) -> Vec<MonthlySentiment> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for sample in scores {
        if let Some(instant) = Utc.timestamp_millis_opt(sample.timestamp_ms).single() {
            use chrono::Datelike;
            by_month
                .entry((instant.year(), instant.month()))
                .or_default()
                .push(sample.score);
        }
    }
    by_month
        .into_iter()
        .filter_map(|((year, month), values)| {
            stats::mean(&values).map(|average| MonthlySentiment {
                month: format!("{year:04}-{month:02}"),
                average,
                scored_messages: values.len() as u32,
            })
        })
        .collect()
}
