//! @acp:module "Completeness Gate"
//! @acp:summary "Decide which derivation stages have enough data to run"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! Pure predicates over a [`Snapshot`]. A closed gate is not an error:
//! the matching stage is skipped for the pass.

use serde::{Deserialize, Serialize};

use crate::config::ResultsGatePolicy;
use crate::reader::Snapshot;

/// True when any rating is H/M/L, or any goal has a positive override strength
pub fn support_data_complete(snapshot: &Snapshot) -> bool {
    let rated = snapshot
        .ratings
        .iter()
        .flatten()
        .any(|rating| rating.is_present());
    rated || snapshot.overrides.iter().any(|o| o.strength() > 0.0)
}

/// True when at least one method has a positive score
pub fn assessment_weights_complete(snapshot: &Snapshot) -> bool {
    snapshot.methods.iter().any(|method| method.score > 0.0)
}

/// True when every method has both result fields and a positive full score
///
/// A blank `result.N.total` counts as present when `method.N.score` is
/// filled, since the reader takes the full score from the method table then.
pub fn assessment_results_complete(snapshot: &Snapshot, policy: ResultsGatePolicy) -> bool {
    if snapshot.results.len() < snapshot.method_count {
        return false;
    }
    snapshot.results.iter().all(|result| match result {
        Some(r) => {
            r.full_score > 0.0
                && match policy {
                    ResultsGatePolicy::FullScoreOnly => true,
                    ResultsGatePolicy::RequirePositiveAverage => r.avg_score > 0.0,
                }
        }
        None => false,
    })
}

/// @acp:summary "Gate decisions for one pass"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateState {
    pub support: bool,
    pub weights: bool,
    pub results: bool,
}

impl GateState {
    pub fn evaluate(snapshot: &Snapshot, policy: ResultsGatePolicy) -> Self {
        Self {
            support: support_data_complete(snapshot),
            weights: assessment_weights_complete(snapshot),
            results: assessment_results_complete(snapshot, policy),
        }
    }

    /// Achievement needs both assessment tables
    pub fn assessment(&self) -> bool {
        self.weights && self.results
    }

    /// The aggregate needs all three matrices
    pub fn all(&self) -> bool {
        self.support && self.weights && self.results
    }
}
