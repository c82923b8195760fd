use serde::Serialize;

use crate::config::PatternSettings;
use crate::engagement::DailySeries;
use crate::stats;

const DAY_MS: i64 = 86_400_000;

/// A period of unusually intense messaging.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Burst {
    pub start_ms: i64,
    pub end_ms: i64,
    pub days: u32,
    pub total_messages: u32,
    pub peak_day_ms: i64,
    pub peak_count: u32,
}

/// Flags days whose count exceeds the trailing rolling mean by the
/// configured number of standard deviations, then merges adjacent burst days
/// into burst periods. The first window's worth of days has no baseline and
/// is never flagged.
pub fn detect_bursts(daily: &DailySeries, settings: &PatternSettings) -> Vec<Burst> {
    let window = settings.burst_window_days;
    if daily.counts.len() <= window {
        return Vec::new();
    }
    let mut burst_days: Vec<usize> = Vec::new();
    for index in window..daily.counts.len() {
        let baseline: Vec<f64> = daily.counts[index - window..index]
            .iter()
            .map(|c| f64::from(*c))
            .collect();
        let Some(mean) = stats::mean(&baseline) else {
            continue;
        };
        let deviation = stats::std_dev(&baseline).unwrap_or(0.0);
        let count = f64::from(daily.counts[index]);
        if count > mean + settings.burst_sigma * deviation && daily.counts[index] > 0 {
            burst_days.push(index);
        }
    }

    let mut bursts: Vec<Burst> = Vec::new();
    for day in burst_days {
        let count = daily.counts[day];
        let day_ms = daily.day_of(day) * DAY_MS;
        // end_ms is exclusive, so an adjacent day starts exactly at it.
        let extend = bursts.last().map_or(false, |b| b.end_ms == day_ms);
        if extend {
            let burst = bursts.last_mut().unwrap();
            burst.end_ms = day_ms + DAY_MS;
            burst.days += 1;
            burst.total_messages += count;
            if count > burst.peak_count {
                burst.peak_count = count;
                burst.peak_day_ms = day_ms;
            }
        } else {
            bursts.push(Burst {
                start_ms: day_ms,
                end_ms: day_ms + DAY_MS,
                days: 1,
                total_messages: count,
                peak_day_ms: day_ms,
                peak_count: count,
            });
        }
    }
    bursts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(counts: Vec<u32>) -> DailySeries {
        DailySeries {
            start_day: 0,
            counts,
        }
    }

    #[test]
    fn single_spike_yields_one_burst_with_correct_boundaries() {
        let mut counts = vec![20u32; 30];
        counts[15] = 200;
        let bursts = detect_bursts(&series(counts), &PatternSettings::default());
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].start_ms, 15 * DAY_MS);
        assert_eq!(bursts[0].end_ms, 16 * DAY_MS);
        assert_eq!(bursts[0].peak_count, 200);
        assert_eq!(bursts[0].total_messages, 200);
    }

    #[test]
    fn adjacent_burst_days_merge() {
        let mut counts = vec![10u32; 30];
        counts[12] = 120;
        counts[13] = 150;
        let bursts = detect_bursts(&series(counts), &PatternSettings::default());
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].days, 2);
        assert_eq!(bursts[0].peak_count, 150);
        assert_eq!(bursts[0].peak_day_ms, 13 * DAY_MS);
    }

    #[test]
    fn flat_series_has_no_bursts() {
        let bursts = detect_bursts(&series(vec![15; 40]), &PatternSettings::default());
        assert!(bursts.is_empty());
    }

    #[test]
    fn short_series_has_no_baseline() {
        let bursts = detect_bursts(&series(vec![5, 100]), &PatternSettings::default());
        assert!(bursts.is_empty());
    }
}
