//! @acp:module "Pass Report"
//! @acp:summary "Outcome of one recompute pass"
//! @acp:domain scoring
//! @acp:layer types

use serde::{Deserialize, Serialize};

use crate::config::EngineKind;
use crate::derive::{GoalAchievements, GoalWeights};
use crate::gate::GateState;

/// @acp:summary "What happened to one derivation stage"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageOutcome {
    /// Derived and written back
    Applied,
    /// Gate closed; nothing written
    Skipped { reason: String },
    /// Inputs present but not derivable (e.g. zero total strength)
    Invalid { reason: String },
    /// Derivation or write-back raised an error
    Failed { error: String },
}

impl StageOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        StageOutcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        StageOutcome::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied)
    }
}

impl Default for StageOutcome {
    fn default() -> Self {
        StageOutcome::skipped("not run")
    }
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageOutcome::Applied => write!(f, "applied"),
            StageOutcome::Skipped { reason } => write!(f, "skipped ({})", reason),
            StageOutcome::Invalid { reason } => write!(f, "invalid ({})", reason),
            StageOutcome::Failed { error } => write!(f, "failed ({})", error),
        }
    }
}

/// @acp:summary "Gates, stage outcomes and derived values of a pass"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub engine: EngineKind,
    pub goal_count: usize,
    pub method_count: usize,
    pub gates: GateState,
    pub weight_stage: StageOutcome,
    pub achievement_stage: StageOutcome,
    pub overall_stage: StageOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<GoalWeights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<GoalAchievements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<f64>,
}

impl PassReport {
    pub fn new(engine: EngineKind, goal_count: usize, method_count: usize, gates: GateState) -> Self {
        Self {
            engine,
            goal_count,
            method_count,
            gates,
            weight_stage: StageOutcome::default(),
            achievement_stage: StageOutcome::default(),
            overall_stage: StageOutcome::default(),
            weights: None,
            achievements: None,
            overall: None,
        }
    }

    /// True when no stage failed
    pub fn is_clean(&self) -> bool {
        ![&self.weight_stage, &self.achievement_stage, &self.overall_stage]
            .iter()
            .any(|stage| matches!(stage, StageOutcome::Failed { .. }))
    }
}
