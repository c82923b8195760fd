//! Timing analysis: logical turns, response-time distributions, session
//! segmentation and silences. The turn sequence built here is computed once
//! and shared with every detector that needs it.

mod response;
mod sessions;
mod turns;

pub use response::{
    extract_response_samples, response_time_stats, ResponseSample, ResponseTimeStats,
    TrendDirection,
};
pub use sessions::{detect_sessions, LongestSilence, SessionStats};
pub use turns::{build_turns, Turn, TurnSequence};

use chrono::{DateTime, Datelike, Utc};

/// Months since year zero, used as the x axis for monthly trend regressions.
pub fn month_index(instant: DateTime<Utc>) -> i32 {
    instant.year() * 12 + instant.month0() as i32
}
