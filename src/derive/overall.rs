//! @acp:module "Aggregate Derivation"
//! @acp:summary "Overall achievement as the weight-averaged goal achievement"
//! @acp:domain scoring
//! @acp:layer logic

use super::{ensure_finite, round_to, GoalAchievements, GoalWeights};
use crate::error::{AchieveError, Result};

const STAGE: &str = "overall";

/// @acp:summary "Combine goal weights and achievements into one score"
///
/// Weights are taken at full precision, achievements as stored.
pub fn derive_overall_achievement(
    weights: &GoalWeights,
    achievements: &GoalAchievements,
    decimals: usize,
) -> Result<f64> {
    if weights.goal_count() != achievements.goal_count() {
        return Err(AchieveError::stage(
            STAGE,
            format!(
                "goal count mismatch: {} weights, {} achievements",
                weights.goal_count(),
                achievements.goal_count()
            ),
        ));
    }

    let overall: f64 = weights
        .weights
        .iter()
        .zip(&achievements.values)
        .map(|(w, a)| w * a)
        .sum();

    let overall = ensure_finite(STAGE, "overall achievement", overall)?;
    Ok(round_to(overall, decimals))
}
