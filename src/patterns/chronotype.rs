use chrono::{Datelike, Timelike, Weekday};
use serde::Serialize;

use crate::model::UnifiedMessage;
use crate::stats;

/// Coarse chronotype label derived from the circular peak hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChronotypeLabel {
    EarlyBird,
    Daytime,
    Evening,
    NightOwl,
}

/// One person's messaging clock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonChronotype {
    pub participant_id: String,
    /// Circular mean hour of day, fractional.
    pub peak_hour: Option<f64>,
    pub label: Option<ChronotypeLabel>,
    pub weekday_peak_hour: Option<f64>,
    pub weekend_peak_hour: Option<f64>,
    /// Circular distance between weekday and weekend peaks.
    pub social_jetlag_hours: Option<f64>,
}

/// Pairwise clock alignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronotypeCompatibility {
    pub participant_a: String,
    pub participant_b: String,
    pub circular_distance_hours: f64,
    /// Cosine falloff: 0h apart scores 100, 6h and beyond scores 0.
    pub score: f64,
}

/// Chronotype block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChronotypeReport {
    pub per_person: Vec<PersonChronotype>,
    pub compatibility: Option<ChronotypeCompatibility>,
}

/// Circular statistics per person, plus compatibility for the analyzed pair.
pub fn chronotype_report(
    messages: &[UnifiedMessage],
    participant_ids: &[String],
    pair: Option<(&str, &str)>,
) -> ChronotypeReport {
    let per_person: Vec<PersonChronotype> = participant_ids
        .iter()
        .map(|id| person_chronotype(id, messages))
        .collect();

    let compatibility = pair.and_then(|(a, b)| {
        let peak_a = per_person
            .iter()
            .find(|p| p.participant_id == a)?
            .peak_hour?;
        let peak_b = per_person
            .iter()
            .find(|p| p.participant_id == b)?
            .peak_hour?;
        let distance = stats::circular_distance_hours(peak_a, peak_b);
        Some(ChronotypeCompatibility {
            participant_a: a.to_string(),
            participant_b: b.to_string(),
            circular_distance_hours: distance,
            score: compatibility_score(distance),
        })
    });

    ChronotypeReport {
        per_person,
        compatibility,
    }
}

/// Smooth falloff of circular distance; clamped so anything half a day out
/// or worse reads as zero.
pub fn compatibility_score(distance_hours: f64) -> f64 {
    let angle = distance_hours * std::f64::consts::PI / 12.0;
    (angle.cos().max(0.0)) * 100.0
}

fn person_chronotype(participant_id: &str, messages: &[UnifiedMessage]) -> PersonChronotype {
    let mut all_hours = Vec::new();
    let mut weekday_hours = Vec::new();
    let mut weekend_hours = Vec::new();
    for message in messages.iter().filter(|m| m.sender == participant_id) {
        let instant = message.timestamp();
        let hour = f64::from(instant.hour()) + f64::from(instant.minute()) / 60.0;
        all_hours.push(hour);
        if matches!(instant.weekday(), Weekday::Sat | Weekday::Sun) {
            weekend_hours.push(hour);
        } else {
            weekday_hours.push(hour);
        }
    }
    let peak_hour = stats::circular_mean_hour(&all_hours);
    let weekday_peak_hour = stats::circular_mean_hour(&weekday_hours);
    let weekend_peak_hour = stats::circular_mean_hour(&weekend_hours);
    let social_jetlag_hours = match (weekday_peak_hour, weekend_peak_hour) {
        (Some(wd), Some(we)) => Some(stats::circular_distance_hours(wd, we)),
        _ => None,
    };
    PersonChronotype {
        participant_id: participant_id.to_string(),
        peak_hour,
        label: peak_hour.map(label_for),
        weekday_peak_hour,
        weekend_peak_hour,
        social_jetlag_hours,
    }
}

fn label_for(peak_hour: f64) -> ChronotypeLabel {
    match peak_hour {
        h if (5.0..11.0).contains(&h) => ChronotypeLabel::EarlyBird,
        h if (11.0..17.0).contains(&h) => ChronotypeLabel::Daytime,
        h if (17.0..21.0).contains(&h) => ChronotypeLabel::Evening,
        _ => ChronotypeLabel::NightOwl,
    }
}
