//! Pattern detectors: bursts, conflicts and their fingerprints,
//! pursuit-withdrawal cycles, reciprocity, bids and chronotypes. Every
//! detector consumes the shared intermediates; none re-derives turns or
//! message scores on its own.

mod bids;
mod bursts;
mod chronotype;
mod conflict;
mod pursuit;
mod reciprocity;

pub use bids::{bid_response_stats, BidStats};
pub use bursts::{detect_bursts, Burst};
pub use chronotype::{
    chronotype_report, compatibility_score, ChronotypeCompatibility, ChronotypeLabel,
    ChronotypeReport, PersonChronotype,
};
pub use conflict::{
    detect_conflicts, fingerprint_conflicts, ConflictEvent, ConflictFingerprint, ConflictSignal,
    DeescalationStyle, EscalationStyle,
};
pub use pursuit::{detect_pursuit_withdrawal, PursuitCycle, PursuitWithdrawal};
pub use reciprocity::{reciprocity_index, ReciprocityIndex, ReciprocityInputs};

use serde::Serialize;

/// Pattern-detector block of the final report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResults {
    pub bursts: Vec<Burst>,
    pub conflicts: Vec<ConflictEvent>,
    pub conflict_fingerprints: Option<Vec<ConflictFingerprint>>,
    pub pursuit_withdrawal: Option<PursuitWithdrawal>,
    pub reciprocity: Option<ReciprocityIndex>,
    pub bids: BidStats,
    pub chronotype: ChronotypeReport,
}
