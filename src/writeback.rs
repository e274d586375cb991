//! @acp:module "Write-Back"
//! @acp:summary "Fan derived values out to every field that mirrors them"
//! @acp:domain scoring
//! @acp:layer io
//!
//! Each stage builds its complete list of writes first and applies it as
//! one unit. If any write is rejected, the cells already written in that
//! unit get their previous text back, so primary and mirror cells never
//! disagree after a failed stage.

use crate::derive::{format_fixed, GoalAchievements, GoalWeights};
use crate::error::Result;
use crate::fields::{FieldId, FieldSpace};

/// Field writes of one stage, in application order
pub type Writes = Vec<(FieldId, String)>;

/// Plain number text: integers without decimals, others as-is
fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Goal weights for the primary and summary cells, plus the strength total
pub fn weight_writes(weights: &GoalWeights, decimals: usize) -> Writes {
    let mut writes = Vec::with_capacity(weights.weights.len() * 2 + 1);
    for (i, weight) in weights.weights.iter().enumerate() {
        let goal = i + 1;
        let text = format_fixed(*weight, decimals);
        writes.push((FieldId::GoalWeight { goal }, text.clone()));
        writes.push((FieldId::GoalWeightMirror { goal }, text));
    }
    writes.push((FieldId::TotalWeight, format_plain(weights.total_strength)));
    writes
}

/// Goal achievements for the primary and summary cells
pub fn achievement_writes(achievements: &GoalAchievements, decimals: usize) -> Writes {
    let mut writes = Vec::with_capacity(achievements.values.len() * 2);
    for (i, value) in achievements.values.iter().enumerate() {
        let goal = i + 1;
        let text = format_fixed(*value, decimals);
        writes.push((FieldId::GoalAchievement { goal }, text.clone()));
        writes.push((FieldId::GoalAchievementMirror { goal }, text));
    }
    writes
}

fn overall_writes(text: &str) -> Writes {
    vec![
        (FieldId::OverallAchievement, text.to_string()),
        (FieldId::OverallAchievementMirror, text.to_string()),
    ]
}

/// @acp:summary "Apply writes all-or-nothing"
///
/// On the first rejected write, every earlier write of the batch is
/// reverted (restored or removed) and the error is returned.
pub fn apply(fields: &mut dyn FieldSpace, writes: Writes) -> Result<()> {
    let mut previous: Vec<(FieldId, Option<String>)> = Vec::with_capacity(writes.len());
    for (id, value) in writes {
        let before = fields.get(&id).map(str::to_string);
        if let Err(e) = fields.set(&id, value) {
            for (id, before) in previous.into_iter().rev() {
                match before {
                    Some(text) => {
                        if let Err(restore) = fields.set(&id, text) {
                            tracing::warn!(field = %id, error = %restore, "could not restore field");
                        }
                    }
                    None => {
                        fields.remove(&id);
                    }
                }
            }
            return Err(e);
        }
        previous.push((id, before));
    }
    Ok(())
}

pub fn publish_weights(
    fields: &mut dyn FieldSpace,
    weights: &GoalWeights,
    decimals: usize,
) -> Result<()> {
    apply(fields, weight_writes(weights, decimals))
}

pub fn publish_achievements(
    fields: &mut dyn FieldSpace,
    achievements: &GoalAchievements,
    decimals: usize,
) -> Result<()> {
    apply(fields, achievement_writes(achievements, decimals))
}

pub fn publish_overall(fields: &mut dyn FieldSpace, overall: f64, decimals: usize) -> Result<()> {
    apply(fields, overall_writes(&format_fixed(overall, decimals)))
}

/// Replace the overall score with the placeholder so a stale value never shows
pub fn reset_overall(fields: &mut dyn FieldSpace, placeholder: &str) -> Result<()> {
    apply(fields, overall_writes(placeholder))
}

/// Drop derived cells of goals in `from..=to`; returns how many existed
pub fn clear_goal_outputs(fields: &mut dyn FieldSpace, from: usize, to: usize) -> usize {
    let mut removed = 0;
    for goal in from..=to {
        for id in [
            FieldId::GoalWeight { goal },
            FieldId::GoalWeightMirror { goal },
            FieldId::GoalAchievement { goal },
            FieldId::GoalAchievementMirror { goal },
        ] {
            if fields.remove(&id).is_some() {
                removed += 1;
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::MemoryFields;

    #[test]
    fn test_weights_fan_out() {
        let mut fields = MemoryFields::new();
        let weights = GoalWeights {
            strengths: vec![3.0, 2.0, 1.0],
            total_strength: 6.0,
            weights: vec![0.5, 2.0 / 6.0, 1.0 / 6.0],
        };

        publish_weights(&mut fields, &weights, 3).unwrap();

        assert_eq!(fields.get(&FieldId::GoalWeight { goal: 1 }), Some("0.500"));
        assert_eq!(fields.get(&FieldId::GoalWeightMirror { goal: 2 }), Some("0.333"));
        assert_eq!(fields.get(&FieldId::GoalWeight { goal: 3 }), Some("0.167"));
        assert_eq!(fields.get(&FieldId::TotalWeight), Some("6"));
    }

    #[test]
    fn test_total_weight_keeps_fraction() {
        let mut fields = MemoryFields::new();
        let weights = GoalWeights {
            strengths: vec![2.5],
            total_strength: 2.5,
            weights: vec![1.0],
        };
        publish_weights(&mut fields, &weights, 3).unwrap();
        assert_eq!(fields.get(&FieldId::TotalWeight), Some("2.5"));
    }

    #[test]
    fn test_reset_overall_uses_placeholder() {
        let mut fields = MemoryFields::new().with(FieldId::OverallAchievement, "0.812");
        reset_overall(&mut fields, "0.00").unwrap();
        assert_eq!(fields.get(&FieldId::OverallAchievement), Some("0.00"));
        assert_eq!(fields.get(&FieldId::OverallAchievementMirror), Some("0.00"));
    }

    /// Rejects writes to one key
    struct LockedField {
        inner: MemoryFields,
        locked: FieldId,
    }

    impl FieldSpace for LockedField {
        fn get(&self, id: &FieldId) -> Option<&str> {
            self.inner.get(id)
        }

        fn set(&mut self, id: &FieldId, value: String) -> Result<()> {
            if *id == self.locked {
                return Err(crate::error::AchieveError::ReadOnlyField {
                    key: id.to_string(),
                });
            }
            self.inner.set(id, value)
        }

        fn remove(&mut self, id: &FieldId) -> Option<String> {
            self.inner.remove(id)
        }
    }

    #[test]
    fn test_rejected_write_reverts_batch() {
        let mut fields = LockedField {
            inner: MemoryFields::new()
                .with(FieldId::GoalWeight { goal: 1 }, "OLD")
                .with(FieldId::GoalWeightMirror { goal: 2 }, "OLD"),
            locked: FieldId::GoalWeightMirror { goal: 2 },
        };
        let weights = GoalWeights {
            strengths: vec![3.0, 1.0],
            total_strength: 4.0,
            weights: vec![0.75, 0.25],
        };

        assert!(publish_weights(&mut fields, &weights, 3).is_err());

        let inner = &fields.inner;
        assert_eq!(inner.get(&FieldId::GoalWeight { goal: 1 }), Some("OLD"));
        assert_eq!(inner.get(&FieldId::GoalWeightMirror { goal: 1 }), None);
        assert_eq!(inner.get(&FieldId::GoalWeight { goal: 2 }), None);
        assert_eq!(inner.get(&FieldId::GoalWeightMirror { goal: 2 }), Some("OLD"));
        assert_eq!(inner.get(&FieldId::TotalWeight), None);
    }

    #[test]
    fn test_clear_goal_outputs() {
        let mut fields = MemoryFields::new()
            .with(FieldId::GoalWeight { goal: 5 }, "0.100")
            .with(FieldId::GoalAchievementMirror { goal: 6 }, "0.900")
            .with(FieldId::GoalWeight { goal: 4 }, "0.200");

        assert_eq!(clear_goal_outputs(&mut fields, 5, 12), 2);
        assert!(fields.contains(&FieldId::GoalWeight { goal: 4 }));
    }
}
