//! @acp:module "Achievement Derivation"
//! @acp:summary "Per-goal achievement from method weights and class averages"
//! @acp:domain scoring
//! @acp:layer logic

use serde::{Deserialize, Serialize};

use super::{ensure_finite, round_to};
use crate::error::Result;
use crate::reader::Snapshot;

const STAGE: &str = "achievement";

/// @acp:summary "Achievement ratio per goal"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAchievements {
    /// Rounded achievement, indexed by `goal - 1`
    pub values: Vec<f64>,
    /// Whether any method with a positive weight fed the goal
    pub has_data: Vec<bool>,
}

impl GoalAchievements {
    pub fn goal_count(&self) -> usize {
        self.values.len()
    }

    pub fn achievement(&self, goal: usize) -> f64 {
        goal.checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// @acp:summary "Derive per-goal achievement"
///
/// `achievement[i] = sum over methods of weight[m][i] * avg[m] / full[m]`,
/// skipping methods without a positive full score. Goals are independent:
/// a goal nothing feeds reads 0 without affecting the others.
pub fn derive_goal_achievements(snapshot: &Snapshot, decimals: usize) -> Result<GoalAchievements> {
    let ratios: Vec<Option<f64>> = (0..snapshot.method_count)
        .map(|m| snapshot.results.get(m).copied().flatten().and_then(|r| r.ratio()))
        .collect();

    let mut values = Vec::with_capacity(snapshot.goal_count);
    let mut has_data = Vec::with_capacity(snapshot.goal_count);

    for goal in 1..=snapshot.goal_count {
        let mut sum = 0.0;
        let mut fed = false;
        for (m, ratio) in ratios.iter().enumerate() {
            let Some(ratio) = ratio else { continue };
            let weight = snapshot
                .methods
                .get(m)
                .map(|method| method.weight_for(goal))
                .unwrap_or(0.0);
            if weight != 0.0 {
                fed = true;
            }
            sum += weight * ratio;
        }

        let sum = ensure_finite(STAGE, &format!("achievement of goal {}", goal), sum)?;
        if !fed {
            tracing::debug!(goal, "no method contributes to goal");
        }
        values.push(round_to(sum, decimals));
        has_data.push(fed);
    }

    tracing::debug!(?values, "derived goal achievements");

    Ok(GoalAchievements { values, has_data })
}
