//! Style and diversity metrics: vocabulary diversity (MTLD), Language Style
//! Matching, pronoun and time-orientation rates, integrative complexity.

mod complexity;
mod lsm;
mod mtld;
mod orientation;

pub use complexity::{integrative_complexity, IntegrativeComplexity};
pub use lsm::{language_style_matching, CategoryLsm, LsmResult};
pub use mtld::mtld;
pub use orientation::{pronoun_rates, time_orientation, PronounRates, TimeOrientation};

use serde::Serialize;

/// Per-person style block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStyle {
    pub participant_id: String,
    pub mtld: Option<f64>,
    pub pronouns: Option<PronounRates>,
    pub time_orientation: Option<TimeOrientation>,
    pub integrative_complexity: Option<IntegrativeComplexity>,
}

/// Style block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMetrics {
    pub per_person: Vec<PersonStyle>,
    /// Pairwise LSM for the analyzed pair; `None` for solo conversations or
    /// when neither side clears the usage floor.
    pub lsm: Option<LsmResult>,
}
