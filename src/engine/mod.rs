//! @acp:module "Calculation Engine"
//! @acp:summary "Recompute pipeline: gate, read, derive, write back"
//! @acp:domain scoring
//! @acp:layer service
//!
//! Every pass re-reads the field space and recomputes all derived values
//! from scratch. Stages are isolated from each other: a failing stage is
//! logged, reported to the notifier and recorded in the [`PassReport`],
//! and the pass carries on.

mod dynamic;
mod fixed;
mod report;

use std::sync::Arc;

pub use dynamic::DynamicEngine;
pub use fixed::StaticEngine;
pub use report::{PassReport, StageOutcome};

use crate::config::{Config, EngineKind};
use crate::derive::{derive_goal_achievements, derive_goal_weights, derive_overall_achievement};
use crate::error::AchieveError;
use crate::fields::FieldSpace;
use crate::gate::GateState;
use crate::notify::{Notifier, Severity};
use crate::reader::{read_indicator_row_count, read_method_count, Snapshot};
use crate::writeback;

/// Shared state of every engine implementation
#[derive(Clone)]
pub struct EngineCore {
    pub config: Config,
    notifier: Option<Arc<dyn Notifier>>,
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("config", &self.config)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl EngineCore {
    pub fn new(config: Config, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { config, notifier }
    }

    fn notify(&self, title: &str, message: &str, severity: Severity) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(title, message, severity);
        }
    }

    fn fault(&self, title: &str, error: &AchieveError) -> StageOutcome {
        tracing::warn!(stage = title, error = %error, "stage failed");
        self.notify(title, &error.to_string(), Severity::Error);
        StageOutcome::Failed {
            error: error.to_string(),
        }
    }

    /// @acp:summary "Run one full pass for fixed table dimensions"
    pub fn run_pass(
        &self,
        engine: EngineKind,
        fields: &mut dyn FieldSpace,
        goal_count: usize,
        method_count: usize,
        row_count: usize,
    ) -> PassReport {
        let decimals = self.config.display_decimals;
        let snapshot = Snapshot::read(&*fields, goal_count, method_count, row_count);
        let gates = GateState::evaluate(&snapshot, self.config.results_gate);
        tracing::debug!(goal_count, method_count, row_count, ?gates, "recompute pass started");

        let mut report = PassReport::new(engine, goal_count, method_count, gates);

        if gates.support {
            let derived = derive_goal_weights(&snapshot).and_then(|weights| {
                if let Some(weights) = &weights {
                    writeback::publish_weights(fields, weights, decimals)?;
                }
                Ok(weights)
            });
            match derived {
                Ok(Some(weights)) => {
                    report.weights = Some(weights);
                    report.weight_stage = StageOutcome::Applied;
                }
                Ok(None) => {
                    let reason = "total support strength is zero, weights cannot be normalized";
                    self.notify("Goal weights", reason, Severity::Warning);
                    report.weight_stage = StageOutcome::invalid(reason);
                }
                Err(e) => report.weight_stage = self.fault("Goal weights", &e),
            }
        } else {
            report.weight_stage = StageOutcome::skipped("no support ratings entered");
        }

        if gates.assessment() {
            let derived = derive_goal_achievements(&snapshot, decimals).and_then(|achievements| {
                writeback::publish_achievements(fields, &achievements, decimals)?;
                Ok(achievements)
            });
            match derived {
                Ok(achievements) => {
                    report.achievements = Some(achievements);
                    report.achievement_stage = StageOutcome::Applied;
                }
                Err(e) => report.achievement_stage = self.fault("Goal achievements", &e),
            }
        } else if !gates.weights {
            report.achievement_stage = StageOutcome::skipped("no assessment method has a score");
        } else {
            report.achievement_stage = StageOutcome::skipped("assessment results are incomplete");
        }

        report.overall_stage = match (&report.weights, &report.achievements) {
            (Some(weights), Some(achievements)) if gates.all() => {
                let derived = derive_overall_achievement(weights, achievements, decimals)
                    .and_then(|overall| {
                        writeback::publish_overall(fields, overall, decimals)?;
                        Ok(overall)
                    });
                match derived {
                    Ok(overall) => {
                        report.overall = Some(overall);
                        StageOutcome::Applied
                    }
                    Err(e) => {
                        let outcome = self.fault("Overall achievement", &e);
                        let _ = self.reset_overall(fields);
                        outcome
                    }
                }
            }
            _ => match self.reset_overall(fields) {
                Ok(()) => StageOutcome::skipped("weights or achievements unavailable this pass"),
                Err(outcome) => outcome,
            },
        };

        tracing::info!(
            engine = %engine,
            weights = %report.weight_stage,
            achievements = %report.achievement_stage,
            overall = %report.overall_stage,
            "recompute pass finished"
        );
        report
    }

    fn reset_overall(&self, fields: &mut dyn FieldSpace) -> Result<(), StageOutcome> {
        writeback::reset_overall(fields, &self.config.overall_placeholder)
            .map_err(|e| self.fault("Overall achievement", &e))
    }
}

/// @acp:summary "Strategy computing derived report values from the field space"
pub trait CalculationEngine: Send + Sync {
    fn core(&self) -> &EngineCore;

    fn kind(&self) -> EngineKind;

    /// Goal count for the current pass
    fn goal_count(&self, fields: &dyn FieldSpace) -> usize;

    /// Method count for the current pass, capped at `maxMethods`
    fn method_count(&self, fields: &dyn FieldSpace) -> usize {
        let config = &self.core().config;
        read_method_count(fields, config.default_method_count, config.max_methods)
    }

    /// Indicator rows for the current pass, capped at `maxIndicatorRows`
    fn row_count(&self, fields: &dyn FieldSpace) -> usize {
        read_indicator_row_count(fields, self.core().config.max_indicator_rows)
    }

    /// @acp:summary "Recompute every derived value from current field contents"
    fn recompute(&self, fields: &mut dyn FieldSpace) -> PassReport {
        let goal_count = self.goal_count(&*fields);
        let method_count = self.method_count(&*fields);
        let row_count = self.row_count(&*fields);
        self.core()
            .run_pass(self.kind(), fields, goal_count, method_count, row_count)
    }

    /// Called after goals or methods were added or removed
    fn on_structure_changed(&self, fields: &mut dyn FieldSpace) -> PassReport {
        self.recompute(fields)
    }
}

/// @acp:summary "Construct the engine selected by the config"
pub fn build_engine(
    config: Config,
    notifier: Option<Arc<dyn Notifier>>,
) -> Box<dyn CalculationEngine> {
    match config.engine {
        EngineKind::Static => Box::new(StaticEngine::new(config, notifier)),
        EngineKind::Dynamic => Box::new(DynamicEngine::new(config, notifier)),
    }
}
