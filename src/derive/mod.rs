//! @acp:module "Derivations"
//! @acp:summary "Goal weight, goal achievement and overall achievement calculations"
//! @acp:domain scoring
//! @acp:layer logic

pub mod achievement;
pub mod overall;
pub mod weights;

pub use achievement::{derive_goal_achievements, GoalAchievements};
pub use overall::derive_overall_achievement;
pub use weights::{derive_goal_weights, GoalWeights};

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Fixed-decimal display text
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

pub(crate) fn ensure_finite(stage: &'static str, what: &str, value: f64) -> crate::Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(crate::AchieveError::stage(
            stage,
            format!("{} is not a finite number", what),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.8504, 3), 0.85);
        assert_eq!(round_to(0.8505, 2), 0.85);
        assert_eq!(round_to(1.0 / 3.0, 3), 0.333);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(0.5, 3), "0.500");
        assert_eq!(format_fixed(1.0 / 6.0, 3), "0.167");
        assert_eq!(format_fixed(0.0, 2), "0.00");
    }
}
