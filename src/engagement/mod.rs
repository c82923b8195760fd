//! Activity-over-time metrics: daily and monthly message series, hour-of-week
//! heatmaps, streaks. The combined daily series doubles as the input to
//! burst detection.

use std::collections::HashMap;

use chrono::{Datelike, Timelike};
use serde::Serialize;

use crate::model::UnifiedMessage;

const DAY_MS: i64 = 86_400_000;

/// Contiguous per-day message counts (zero-filled), UTC day buckets.
#[derive(Debug, Clone)]
pub struct DailySeries {
    /// Days since the Unix epoch of `counts[0]`.
    pub start_day: i64,
    pub counts: Vec<u32>,
}

impl DailySeries {
    pub fn day_of(&self, offset: usize) -> i64 {
        self.start_day + offset as i64
    }
}

/// Builds the combined zero-filled daily series for the conversation.
pub fn build_daily_series(messages: &[UnifiedMessage]) -> Option<DailySeries> {
    let first = messages.first()?.timestamp_ms.div_euclid(DAY_MS);
    let last = messages.last()?.timestamp_ms.div_euclid(DAY_MS);
    let mut counts = vec![0u32; (last - first + 1) as usize];
    for message in messages {
        let day = message.timestamp_ms.div_euclid(DAY_MS);
        counts[(day - first) as usize] += 1;
    }
    Some(DailySeries {
        start_day: first,
        counts,
    })
}

/// One month of activity in the monthly trend series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyActivity {
    /// Calendar month as `YYYY-MM`.
    pub month: String,
    pub total: u32,
    pub per_person: HashMap<String, u32>,
}

/// A 7×24 hour-of-week activity grid; rows are Monday..Sunday, columns hours.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapGrid {
    pub grid: Vec<Vec<u32>>,
}

impl HeatmapGrid {
    fn new() -> Self {
        Self {
            grid: vec![vec![0u32; 24]; 7],
        }
    }

    fn bump(&mut self, weekday: usize, hour: usize) {
        self.grid[weekday][hour] += 1;
    }
}

/// Engagement block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementStats {
    pub total_messages: u32,
    pub active_days: u32,
    pub span_days: u32,
    pub first_message_ms: Option<i64>,
    pub last_message_ms: Option<i64>,
    pub longest_daily_streak: u32,
    pub monthly_series: Vec<MonthlyActivity>,
    pub heatmap_per_person: HashMap<String, HeatmapGrid>,
    pub heatmap_combined: HeatmapGrid,
}

/// Computes the engagement block from the sanitized stream.
pub fn engagement_stats(
    messages: &[UnifiedMessage],
    participant_ids: &[String],
    daily: Option<&DailySeries>,
) -> EngagementStats {
    let mut combined = HeatmapGrid::new();
    let mut per_person: HashMap<String, HeatmapGrid> = participant_ids
        .iter()
        .map(|id| (id.clone(), HeatmapGrid::new()))
        .collect();
    let mut monthly: std::collections::BTreeMap<(i32, u32), MonthlyActivity> = Default::default();

    for message in messages {
        let instant = message.timestamp();
        let weekday = instant.weekday().num_days_from_monday() as usize;
        let hour = instant.hour() as usize;
        combined.bump(weekday, hour);
        if let Some(grid) = per_person.get_mut(&message.sender) {
            grid.bump(weekday, hour);
        }
        let entry = monthly
            .entry((instant.year(), instant.month()))
            .or_insert_with(|| MonthlyActivity {
                month: format!("{:04}-{:02}", instant.year(), instant.month()),
                total: 0,
                per_person: HashMap::new(),
            });
        entry.total += 1;
        *entry.per_person.entry(message.sender.clone()).or_insert(0) += 1;
    }

    let (active_days, longest_daily_streak) = daily
        .map(|series| {
            let active = series.counts.iter().filter(|c| **c > 0).count() as u32;
            let mut longest = 0u32;
            let mut run = 0u32;
            for count in &series.counts {
                if *count > 0 {
                    run += 1;
                    longest = longest.max(run);
                } else {
                    run = 0;
                }
            }
            (active, longest)
        })
        .unwrap_or((0, 0));

    EngagementStats {
        total_messages: messages.len() as u32,
        active_days,
        span_days: daily.map_or(0, |series| series.counts.len() as u32),
        first_message_ms: messages.first().map(|m| m.timestamp_ms),
        last_message_ms: messages.last().map(|m| m.timestamp_ms),
        longest_daily_streak,
        monthly_series: monthly.into_values().collect(),
        heatmap_per_person: per_person,
        heatmap_combined: combined,
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

    #[test]
    fn daily_series_zero_fills_quiet_days() {
        let messages = vec![msg("a", 0), msg("a", 3 * DAY_MS + 1)];
        let series = build_daily_series(&messages).unwrap();
        assert_eq!(series.counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn streak_and_active_days_from_series() {
        let messages = vec![
            msg("a", 0),
            msg("a", DAY_MS),
            msg("a", 2 * DAY_MS),
            msg("a", 4 * DAY_MS),
        ];
        let series = build_daily_series(&messages);
        let stats = engagement_stats(&messages, &["a".into()], series.as_ref());
        assert_eq!(stats.active_days, 4);
        assert_eq!(stats.span_days, 5);
        assert_eq!(stats.longest_daily_streak, 3);
    }

    #[test]
    fn heatmap_buckets_by_weekday_and_hour() {
        // 1970-01-01 was a Thursday; timestamp 0 lands in row 3, hour 0.
        let messages = vec![msg("a", 0)];
        let stats = engagement_stats(&messages, &["a".into()], None);
        assert_eq!(stats.heatmap_combined.grid[3][0], 1);
        assert_eq!(stats.heatmap_per_person["a"].grid[3][0], 1);
    }

    #[test]
    fn monthly_series_orders_calendar_months() {
        let jan = 1_672_531_200_000; // 2023-01-01
        let messages = vec![msg("a", jan), msg("b", jan + 40 * DAY_MS)];
        let stats = engagement_stats(&messages, &["a".into(), "b".into()], None);
        let months: Vec<&str> = stats
            .monthly_series
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2023-01", "2023-02"]);
    }
}
