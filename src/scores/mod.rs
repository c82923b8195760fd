//! Composite score synthesis: weighted indices with exposed breakdowns,
//! badge rules and percentile rankings against estimated populations.

mod badges;
mod composite;
mod percentile;

pub use badges::{award_badges, BadgeAward, BadgeInputs, ConversationBadgeInputs};
pub use composite::{
    damage_score, health_score, threat_meter, viral_score, ComponentScore, CompositeInputs,
    CompositeScore,
};
pub use percentile::{rank_against_population, EstimatedDistribution, PercentileRanking};

use serde::Serialize;

/// Composite-score block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScores {
    pub health: CompositeScore,
    pub damage: CompositeScore,
    pub threat: CompositeScore,
    pub viral: CompositeScore,
}
