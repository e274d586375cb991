//! @acp:module "Static Engine"
//! @acp:summary "Engine for report templates with a fixed number of goals"
//! @acp:domain scoring
//! @acp:layer service

use std::sync::Arc;

use super::{CalculationEngine, EngineCore};
use crate::config::{Config, EngineKind};
use crate::fields::FieldSpace;
use crate::notify::Notifier;

/// Always computes `defaultGoalCount` goals and ignores `goalCount`
#[derive(Debug, Clone)]
pub struct StaticEngine {
    core: EngineCore,
}

impl StaticEngine {
    pub fn new(config: Config, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            core: EngineCore::new(config, notifier),
        }
    }
}

impl CalculationEngine for StaticEngine {
    fn core(&self) -> &EngineCore {
        &self.core
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Static
    }

    fn goal_count(&self, _fields: &dyn FieldSpace) -> usize {
        self.core.config.default_goal_count
    }
}
