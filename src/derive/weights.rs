//! @acp:module "Weight Derivation"
//! @acp:summary "Turn support-strength ratings into normalized per-goal weights"
//! @acp:domain scoring
//! @acp:layer logic

use serde::{Deserialize, Serialize};

use super::ensure_finite;
use crate::error::Result;
use crate::reader::Snapshot;

const STAGE: &str = "weight";

/// @acp:summary "Normalized goal weights with the strengths they came from"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWeights {
    /// Strength per goal, indexed by `goal - 1`
    pub strengths: Vec<f64>,
    pub total_strength: f64,
    /// Full-precision weights, indexed by `goal - 1`
    pub weights: Vec<f64>,
}

impl GoalWeights {
    pub fn goal_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, goal: usize) -> f64 {
        goal.checked_sub(1)
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Strength of one goal: `3H + 2M + 1L` over indicator rows
///
/// Falls back to the pre-aggregated override fields when the rows give
/// nothing. Negative overrides count as zero.
pub fn goal_strength(snapshot: &Snapshot, goal: usize) -> f64 {
    let from_rows = snapshot.row_strength(goal);
    if from_rows > 0.0 {
        from_rows
    } else {
        snapshot.override_for(goal).strength().max(0.0)
    }
}

/// @acp:summary "Derive normalized goal weights"
///
/// Returns `Ok(None)` when the total strength is zero: no uniform or
/// zero-filled vector is ever produced.
pub fn derive_goal_weights(snapshot: &Snapshot) -> Result<Option<GoalWeights>> {
    let strengths: Vec<f64> = (1..=snapshot.goal_count)
        .map(|goal| goal_strength(snapshot, goal))
        .collect();

    let total_strength = ensure_finite(STAGE, "total strength", strengths.iter().sum())?;
    if total_strength <= 0.0 {
        tracing::debug!("total strength is zero, weights left unset");
        return Ok(None);
    }

    let weights = strengths
        .iter()
        .enumerate()
        .map(|(i, strength)| {
            ensure_finite(STAGE, &format!("weight of goal {}", i + 1), strength / total_strength)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(total_strength, ?weights, "derived goal weights");

    Ok(Some(GoalWeights {
        strengths,
        total_strength,
        weights,
    }))
}
