//! @acp:module "Configuration"
//! @acp:summary "Engine configuration loading and defaults"
//! @acp:domain scoring
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::AchieveError;

/// Default config file looked up by the CLI
pub const DEFAULT_CONFIG_FILE: &str = ".achieve.config.json";

/// @acp:summary "Main engine configuration structure"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which calculation engine to construct
    #[serde(default)]
    pub engine: EngineKind,

    /// Goal count used when `goalCount` is absent or malformed
    #[serde(default = "default_goal_count")]
    pub default_goal_count: usize,

    /// Method count used when `methodCount` is absent or malformed
    #[serde(default = "default_method_count")]
    pub default_method_count: usize,

    /// Upper bound for the dynamic goal count
    #[serde(default = "default_max_goals")]
    pub max_goals: usize,

    /// Upper bound for `methodCount`
    #[serde(default = "default_max_methods")]
    pub max_methods: usize,

    /// Upper bound for the indicator rows of the support table
    #[serde(default = "default_max_indicator_rows")]
    pub max_indicator_rows: usize,

    /// Debounce window for edit bursts, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Completeness policy for the assessment results table
    #[serde(default)]
    pub results_gate: ResultsGatePolicy,

    /// Decimals used when publishing weights, achievements and the overall score
    #[serde(default = "default_display_decimals")]
    pub display_decimals: usize,

    /// Text published as the overall score when it cannot be computed
    #[serde(default = "default_overall_placeholder")]
    pub overall_placeholder: String,

    /// Expected sum of all method full scores (validation only)
    #[serde(default = "default_expected_score_total")]
    pub expected_score_total: f64,
}

fn default_goal_count() -> usize {
    4
}

fn default_method_count() -> usize {
    4
}

fn default_max_goals() -> usize {
    12
}

fn default_max_methods() -> usize {
    20
}

fn default_max_indicator_rows() -> usize {
    200
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_display_decimals() -> usize {
    3
}

fn default_overall_placeholder() -> String {
    "0.00".to_string()
}

fn default_expected_score_total() -> f64 {
    100.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            default_goal_count: default_goal_count(),
            default_method_count: default_method_count(),
            max_goals: default_max_goals(),
            max_methods: default_max_methods(),
            max_indicator_rows: default_max_indicator_rows(),
            debounce_ms: default_debounce_ms(),
            results_gate: ResultsGatePolicy::default(),
            display_decimals: default_display_decimals(),
            overall_placeholder: default_overall_placeholder(),
            expected_score_total: default_expected_score_total(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load config if the file exists, defaults otherwise"
    ///
    /// A file that exists but does not parse or validate is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_goals == 0 {
            return Err(AchieveError::Config("maxGoals must be at least 1".into()));
        }
        if self.default_goal_count == 0 || self.default_goal_count > self.max_goals {
            return Err(AchieveError::Config(format!(
                "defaultGoalCount must be within 1..={}",
                self.max_goals
            )));
        }
        if self.default_method_count > self.max_methods {
            return Err(AchieveError::Config(format!(
                "defaultMethodCount must not exceed maxMethods ({})",
                self.max_methods
            )));
        }
        if self.display_decimals > 9 {
            return Err(AchieveError::Config(
                "displayDecimals must not exceed 9".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// @acp:summary "Calculation engine selected at construction time"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Fixed goal count
    Static,
    /// Goal count re-read from the field space on every pass
    #[default]
    Dynamic,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Static => write!(f, "static"),
            EngineKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// @acp:summary "Completeness policy for assessment results"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultsGatePolicy {
    /// Every method needs a positive full score; a zero average is allowed
    #[default]
    FullScoreOnly,
    /// Every method also needs a positive average score
    RequirePositiveAverage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.engine, EngineKind::Dynamic);
        assert_eq!(config.default_goal_count, 4);
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
        assert_eq!(config.results_gate, ResultsGatePolicy::FullScoreOnly);
        assert_eq!(config.overall_placeholder, "0.00");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"engine": "static", "resultsGate": "require-positive-average"}"#)
                .unwrap();
        assert_eq!(config.engine, EngineKind::Static);
        assert_eq!(config.results_gate, ResultsGatePolicy::RequirePositiveAverage);
        assert_eq!(config.max_goals, 12);
        assert_eq!(config.max_methods, 20);
        assert_eq!(config.max_indicator_rows, 200);
        assert_eq!(config.display_decimals, 3);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.debounce_ms = 50;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());

        std::fs::write(&path, r#"{"maxMethods": 2, "defaultMethodCount": 6}"#).unwrap();
        assert!(Config::load_or_default(&path).is_err());

        std::fs::write(&path, r#"{"maxMethods": 8}"#).unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap().max_methods, 8);
    }

    #[test]
    fn test_validate_rejects_goal_count_above_max() {
        let config = Config {
            default_goal_count: 20,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
