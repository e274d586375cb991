//! @acp:module "Dynamic Engine"
//! @acp:summary "Engine for reports whose goal count changes at runtime"
//! @acp:domain scoring
//! @acp:layer service

use std::sync::Arc;

use super::{CalculationEngine, EngineCore, PassReport};
use crate::config::{Config, EngineKind};
use crate::fields::FieldSpace;
use crate::notify::Notifier;
use crate::reader::read_goal_count;
use crate::writeback;

/// Re-reads `goalCount` on every pass
#[derive(Debug, Clone)]
pub struct DynamicEngine {
    core: EngineCore,
}

impl DynamicEngine {
    pub fn new(config: Config, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            core: EngineCore::new(config, notifier),
        }
    }
}

impl CalculationEngine for DynamicEngine {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Dynamic
    }

    fn goal_count(&self, fields: &dyn FieldSpace) -> usize {
        let config = &self.core.config;
        read_goal_count(fields, config.default_goal_count, config.max_goals)
    }

    /// Removed goals leave derived cells behind; drop them before recomputing
    fn on_structure_changed(&self, fields: &mut dyn FieldSpace) -> PassReport {
        let goal_count = self.goal_count(&*fields);
        let removed = writeback::clear_goal_outputs(fields, goal_count + 1, self.core.config.max_goals);
        if removed > 0 {
            tracing::debug!(goal_count, removed, "cleared outputs of removed goals");
        }
        self.recompute(fields)
    }
}
