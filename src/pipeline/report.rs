use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::accumulator::PersonSummary;
use crate::engagement::EngagementStats;
use crate::model::SkippedCounts;
use crate::patterns::PatternResults;
use crate::scores::{BadgeAward, CompositeScores, PercentileRanking};
use crate::sentiment::SentimentReport;
use crate::style::StyleMetrics;
use crate::text::DetectedLanguage;
use crate::timing::{ResponseTimeStats, SessionStats};

/// Timing block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    pub response_times: Vec<ResponseTimeStats>,
    pub sessions: SessionStats,
}

/// Which pair the pairwise metrics were computed for, and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwisePolicy {
    pub participant_a: String,
    pub participant_b: String,
    /// Always "two_most_active": group chats degrade to the two heaviest
    /// senders, ties broken by participant order.
    pub policy: String,
}

/// Run-level metadata and degradation counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDiagnostics {
    pub analysis_id: Uuid,
    /// SHA-256 over the sanitized stream, for caching and reproducibility.
    pub source_fingerprint: String,
    pub skipped: SkippedCounts,
    pub detected_language: Option<DetectedLanguage>,
    pub pairwise_policy: Option<PairwisePolicy>,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

/// Full output contract of one analysis invocation. Every optional metric is
/// present-or-null so downstream consumers can branch deterministically.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeAnalysis {
    pub persons: Vec<PersonSummary>,
    pub timing: TimingStats,
    pub engagement: EngagementStats,
    pub sentiment: SentimentReport,
    pub style: StyleMetrics,
    pub patterns: PatternResults,
    pub composites: CompositeScores,
    pub badges: Vec<BadgeAward>,
    pub percentiles: Vec<PercentileRanking>,
    pub diagnostics: AnalysisDiagnostics,
}

impl QuantitativeAnalysis {
    /// Camel-case JSON form handed to the UI and AI layers.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize analysis report")
    }
}
