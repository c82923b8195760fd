//! Threshold and tuning configuration for the analysis pipeline.
//!
//! Hosts embed the engine and typically ship defaults; power users can
//! override individual knobs through a TOML fragment. Every field carries a
//! serde default so partial fragments deserialize cleanly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Root settings record for one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisSettings {
    /// Turn merging, session segmentation and response-time filtering knobs.
    #[serde(default)]
    pub timing: TimingSettings,
    /// Lexicon scoring knobs.
    #[serde(default)]
    pub sentiment: SentimentSettings,
    /// Vocabulary-diversity and style-metric gates.
    #[serde(default)]
    pub style: StyleSettings,
    /// Pattern-detector windows and thresholds.
    #[serde(default)]
    pub patterns: PatternSettings,
    /// Execution knobs (thread pool sizing).
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

impl AnalysisSettings {
    /// Parses settings from a TOML fragment supplied by the host application.
    pub fn from_toml_str(data: &str) -> Result<Self> {
        toml::from_str(data).context("Failed to parse analysis settings TOML")
    }
}

/// Timing-analyzer thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Same-sender messages closer than this merge into one logical turn.
    #[serde(default = "default_turn_merge_gap_secs")]
    pub turn_merge_gap_secs: i64,
    /// Silence longer than this starts a new conversation session.
    #[serde(default = "default_session_gap_hours")]
    pub session_gap_hours: i64,
    /// Response times beyond this multiple of the IQR are treated as outliers.
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    /// Months of data required before a trend slope is reported.
    #[serde(default = "default_trend_min_months")]
    pub trend_min_months: usize,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            turn_merge_gap_secs: default_turn_merge_gap_secs(),
            session_gap_hours: default_session_gap_hours(),
            iqr_multiplier: default_iqr_multiplier(),
            trend_min_months: default_trend_min_months(),
        }
    }
}

const fn default_turn_merge_gap_secs() -> i64 {
    120
}

const fn default_session_gap_hours() -> i64 {
    6
}

const fn default_iqr_multiplier() -> f64 {
    3.0
}

const fn default_trend_min_months() -> usize {
    3
}

/// Sentiment-engine thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSettings {
    /// Tokens scanned backwards from a scored word for a negation marker.
    #[serde(default = "default_negation_window")]
    pub negation_window: usize,
    /// Scored messages required before volatility is reported.
    #[serde(default = "default_volatility_min_messages")]
    pub volatility_min_messages: usize,
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            negation_window: default_negation_window(),
            volatility_min_messages: default_volatility_min_messages(),
        }
    }
}

const fn default_negation_window() -> usize {
    2
}

const fn default_volatility_min_messages() -> usize {
    10
}

/// Style and diversity metric gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSettings {
    /// Type-token ratio at which an MTLD segment closes.
    #[serde(default = "default_mtld_ttr_threshold")]
    pub mtld_ttr_threshold: f64,
    /// Minimum word count for a defined MTLD score.
    #[serde(default = "default_mtld_min_words")]
    pub mtld_min_words: usize,
    /// Minimum word count for pronoun-category rates.
    #[serde(default = "default_pronoun_min_words")]
    pub pronoun_min_words: usize,
    /// Minimum word count for the time-orientation index.
    #[serde(default = "default_orientation_min_words")]
    pub orientation_min_words: usize,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            mtld_ttr_threshold: default_mtld_ttr_threshold(),
            mtld_min_words: default_mtld_min_words(),
            pronoun_min_words: default_pronoun_min_words(),
            orientation_min_words: default_orientation_min_words(),
        }
    }
}

const fn default_mtld_ttr_threshold() -> f64 {
    0.72
}

const fn default_mtld_min_words() -> usize {
    50
}

const fn default_pronoun_min_words() -> usize {
    200
}

const fn default_orientation_min_words() -> usize {
    500
}

/// Pattern-detector windows and minimum samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Rolling window (days) behind burst mean/deviation.
    #[serde(default = "default_burst_window_days")]
    pub burst_window_days: usize,
    /// Standard deviations above the rolling mean that flag a burst day.
    #[serde(default = "default_burst_sigma")]
    pub burst_sigma: f64,
    /// Escalation-detection window in minutes.
    #[serde(default = "default_conflict_window_mins")]
    pub conflict_window_mins: i64,
    /// Length spike factor versus the local rolling average.
    #[serde(default = "default_conflict_spike_factor")]
    pub conflict_spike_factor: f64,
    /// Messages in the local rolling-average window.
    #[serde(default = "default_conflict_rolling_messages")]
    pub conflict_rolling_messages: usize,
    /// Silence (days) after an intensive exchange that flags a cold conflict.
    #[serde(default = "default_cold_silence_days")]
    pub cold_silence_days: i64,
    /// Conflict events closer than this many hours collapse into one.
    #[serde(default = "default_conflict_dedup_hours")]
    pub conflict_dedup_hours: i64,
    /// Messages taken on each side of a conflict for fingerprinting.
    #[serde(default = "default_fingerprint_window_messages")]
    pub fingerprint_window_messages: usize,
    /// Conflicts required before fingerprints are reported.
    #[serde(default = "default_fingerprint_min_conflicts")]
    pub fingerprint_min_conflicts: usize,
    /// Unanswered messages that may start a pursuit run.
    #[serde(default = "default_pursuit_run")]
    pub pursuit_run: usize,
    /// Unanswered messages that always count as pursuit.
    #[serde(default = "default_pursuit_run_definite")]
    pub pursuit_run_definite: usize,
    /// Silence (hours) from the other side that completes a withdrawal.
    #[serde(default = "default_withdrawal_silence_hours")]
    pub withdrawal_silence_hours: i64,
    /// Reply window (hours) for a bid to be answerable.
    #[serde(default = "default_bid_reply_window_hours")]
    pub bid_reply_window_hours: i64,
    /// Bids required before a turning-toward rate is reported.
    #[serde(default = "default_bid_min_bids")]
    pub bid_min_bids: usize,
    /// Messages required before the reciprocity index is reported.
    #[serde(default = "default_reciprocity_min_messages")]
    pub reciprocity_min_messages: usize,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            burst_window_days: default_burst_window_days(),
            burst_sigma: default_burst_sigma(),
            conflict_window_mins: default_conflict_window_mins(),
            conflict_spike_factor: default_conflict_spike_factor(),
            conflict_rolling_messages: default_conflict_rolling_messages(),
            cold_silence_days: default_cold_silence_days(),
            conflict_dedup_hours: default_conflict_dedup_hours(),
            fingerprint_window_messages: default_fingerprint_window_messages(),
            fingerprint_min_conflicts: default_fingerprint_min_conflicts(),
            pursuit_run: default_pursuit_run(),
            pursuit_run_definite: default_pursuit_run_definite(),
            withdrawal_silence_hours: default_withdrawal_silence_hours(),
            bid_reply_window_hours: default_bid_reply_window_hours(),
            bid_min_bids: default_bid_min_bids(),
            reciprocity_min_messages: default_reciprocity_min_messages(),
        }
    }
}

const fn default_burst_window_days() -> usize {
    7
}

const fn default_burst_sigma() -> f64 {
    2.0
}

const fn default_conflict_window_mins() -> i64 {
    15
}

const fn default_conflict_spike_factor() -> f64 {
    2.0
}

const fn default_conflict_rolling_messages() -> usize {
    10
}

const fn default_cold_silence_days() -> i64 {
    3
}

const fn default_conflict_dedup_hours() -> i64 {
    4
}

const fn default_fingerprint_window_messages() -> usize {
    30
}

const fn default_fingerprint_min_conflicts() -> usize {
    3
}

const fn default_pursuit_run() -> usize {
    4
}

const fn default_pursuit_run_definite() -> usize {
    6
}

const fn default_withdrawal_silence_hours() -> i64 {
    4
}

const fn default_bid_reply_window_hours() -> i64 {
    4
}

const fn default_bid_min_bids() -> usize {
    10
}

const fn default_reciprocity_min_messages() -> usize {
    30
}

/// Execution knobs for the pipeline itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Threads used for parallel per-message scoring stages.
    #[serde(default = "default_max_parallel_stages")]
    pub max_parallel_stages: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            max_parallel_stages: default_max_parallel_stages(),
        }
    }
}

const fn default_max_parallel_stages() -> usize {
    4
}
