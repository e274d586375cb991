//! @acp:module "Field Identifiers"
//! @acp:summary "Stable keys addressing every input and derived cell of a report"
//! @acp:domain scoring
//! @acp:layer types
//!
//! Goals and methods are 1-based. Indicator rows and their physical
//! columns are 0-based, matching the layout of the support table where
//! column 0 holds either the category cell or the indicator name.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AchieveError;

static INDEXED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(targetHCount|targetMCount|targetLCount|targetStrength|goalWeight|summaryWeight|goalAchievement|summaryAchievement)(\d+)$",
    )
    .unwrap()
});

static SUPPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^support\.(\d+)\.(category|\d+)$").unwrap());

static METHOD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^method\.(\d+)\.(?:(score)|weight\.(\d+))$").unwrap());

static RESULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^result\.(\d+)\.(total|average)$").unwrap());

/// @acp:summary "Key of one cell in the shared field space"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    // Structure
    GoalCount,
    MethodCount,
    IndicatorRowCount,

    // Support matrix
    SupportCategory { row: usize },
    SupportCell { row: usize, col: usize },
    TargetHCount { goal: usize },
    TargetMCount { goal: usize },
    TargetLCount { goal: usize },
    TargetStrength { goal: usize },

    // Assessment methods
    MethodScore { method: usize },
    MethodWeight { method: usize, goal: usize },

    // Assessment results
    ResultTotal { method: usize },
    ResultAverage { method: usize },

    // Derived
    GoalWeight { goal: usize },
    GoalWeightMirror { goal: usize },
    TotalWeight,
    GoalAchievement { goal: usize },
    GoalAchievementMirror { goal: usize },
    OverallAchievement,
    OverallAchievementMirror,
}

impl FieldId {
    /// Whether the engine owns this field (written by write-back, never read as input)
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            FieldId::GoalWeight { .. }
                | FieldId::GoalWeightMirror { .. }
                | FieldId::TotalWeight
                | FieldId::GoalAchievement { .. }
                | FieldId::GoalAchievementMirror { .. }
                | FieldId::OverallAchievement
                | FieldId::OverallAchievementMirror
        )
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::GoalCount => write!(f, "goalCount"),
            FieldId::MethodCount => write!(f, "methodCount"),
            FieldId::IndicatorRowCount => write!(f, "indicatorRowCount"),
            FieldId::SupportCategory { row } => write!(f, "support.{}.category", row),
            FieldId::SupportCell { row, col } => write!(f, "support.{}.{}", row, col),
            FieldId::TargetHCount { goal } => write!(f, "targetHCount{}", goal),
            FieldId::TargetMCount { goal } => write!(f, "targetMCount{}", goal),
            FieldId::TargetLCount { goal } => write!(f, "targetLCount{}", goal),
            FieldId::TargetStrength { goal } => write!(f, "targetStrength{}", goal),
            FieldId::MethodScore { method } => write!(f, "method.{}.score", method),
            FieldId::MethodWeight { method, goal } => {
                write!(f, "method.{}.weight.{}", method, goal)
            }
            FieldId::ResultTotal { method } => write!(f, "result.{}.total", method),
            FieldId::ResultAverage { method } => write!(f, "result.{}.average", method),
            FieldId::GoalWeight { goal } => write!(f, "goalWeight{}", goal),
            FieldId::GoalWeightMirror { goal } => write!(f, "summaryWeight{}", goal),
            FieldId::TotalWeight => write!(f, "totalWeight"),
            FieldId::GoalAchievement { goal } => write!(f, "goalAchievement{}", goal),
            FieldId::GoalAchievementMirror { goal } => write!(f, "summaryAchievement{}", goal),
            FieldId::OverallAchievement => write!(f, "overallAchievement"),
            FieldId::OverallAchievementMirror => write!(f, "summaryOverallAchievement"),
        }
    }
}

fn index(s: &str, key: &str) -> Result<usize, AchieveError> {
    s.parse::<usize>()
        .map_err(|_| AchieveError::UnknownField(key.to_string()))
}

impl FromStr for FieldId {
    type Err = AchieveError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "goalCount" => return Ok(FieldId::GoalCount),
            "methodCount" => return Ok(FieldId::MethodCount),
            "indicatorRowCount" => return Ok(FieldId::IndicatorRowCount),
            "totalWeight" => return Ok(FieldId::TotalWeight),
            "overallAchievement" => return Ok(FieldId::OverallAchievement),
            "summaryOverallAchievement" => return Ok(FieldId::OverallAchievementMirror),
            _ => {}
        }

        if let Some(caps) = INDEXED_PATTERN.captures(key) {
            let goal = index(&caps[2], key)?;
            return Ok(match &caps[1] {
                "targetHCount" => FieldId::TargetHCount { goal },
                "targetMCount" => FieldId::TargetMCount { goal },
                "targetLCount" => FieldId::TargetLCount { goal },
                "targetStrength" => FieldId::TargetStrength { goal },
                "goalWeight" => FieldId::GoalWeight { goal },
                "summaryWeight" => FieldId::GoalWeightMirror { goal },
                "goalAchievement" => FieldId::GoalAchievement { goal },
                _ => FieldId::GoalAchievementMirror { goal },
            });
        }

        if let Some(caps) = SUPPORT_PATTERN.captures(key) {
            let row = index(&caps[1], key)?;
            return Ok(match &caps[2] {
                "category" => FieldId::SupportCategory { row },
                col => FieldId::SupportCell {
                    row,
                    col: index(col, key)?,
                },
            });
        }

        if let Some(caps) = METHOD_PATTERN.captures(key) {
            let method = index(&caps[1], key)?;
            return Ok(match caps.get(3) {
                Some(goal) => FieldId::MethodWeight {
                    method,
                    goal: index(goal.as_str(), key)?,
                },
                None => FieldId::MethodScore { method },
            });
        }

        if let Some(caps) = RESULT_PATTERN.captures(key) {
            let method = index(&caps[1], key)?;
            return Ok(match &caps[2] {
                "total" => FieldId::ResultTotal { method },
                _ => FieldId::ResultAverage { method },
            });
        }

        Err(AchieveError::UnknownField(key.to_string()))
    }
}
