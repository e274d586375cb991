//! @acp:module "Data Readers"
//! @acp:summary "Build a normalized snapshot of the three report matrices"
//! @acp:domain scoring
//! @acp:layer data
//!
//! A [`Snapshot`] is taken once per recompute pass. Every later stage
//! works on the snapshot only, so gates and derivations stay pure.

pub mod parse;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldId, FieldSpace};
pub use parse::{parse_count, parse_number, parse_weight, Rating};

/// @acp:summary "Pre-aggregated strength entered directly instead of per-indicator ratings"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthOverride {
    pub h_count: Option<f64>,
    pub m_count: Option<f64>,
    pub l_count: Option<f64>,
    pub strength: Option<f64>,
}

impl StrengthOverride {
    /// Strength implied by the override fields
    ///
    /// Counts win when they add up to something positive, otherwise the
    /// direct strength field is used.
    pub fn strength(&self) -> f64 {
        if self.h_count.is_some() || self.m_count.is_some() || self.l_count.is_some() {
            let from_counts = 3.0 * self.h_count.unwrap_or(0.0)
                + 2.0 * self.m_count.unwrap_or(0.0)
                + self.l_count.unwrap_or(0.0);
            if from_counts > 0.0 {
                return from_counts;
            }
        }
        self.strength.unwrap_or(0.0)
    }
}

/// @acp:summary "One evaluation instrument from the method table"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMethod {
    /// Score column of the method table
    pub score: f64,
    /// Contribution fraction per goal, indexed by `goal - 1`
    pub weights: Vec<f64>,
}

impl AssessmentMethod {
    pub fn weight_for(&self, goal: usize) -> f64 {
        goal.checked_sub(1)
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// @acp:summary "Observed result of one method from the results table"
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub full_score: f64,
    pub avg_score: f64,
}

impl AssessmentResult {
    /// `avg / full`, `None` when the method cannot contribute
    pub fn ratio(&self) -> Option<f64> {
        if self.full_score > 0.0 {
            Some(self.avg_score / self.full_score)
        } else {
            None
        }
    }
}

/// @acp:summary "Normalized in-memory view of the report for one pass"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub goal_count: usize,
    pub method_count: usize,
    /// Ratings per indicator row, each row indexed by `goal - 1`
    pub ratings: Vec<Vec<Rating>>,
    /// Strength overrides indexed by `goal - 1`
    pub overrides: Vec<StrengthOverride>,
    /// Methods indexed by `method - 1`
    pub methods: Vec<AssessmentMethod>,
    /// Results indexed by `method - 1`; `None` when the row's fields are missing
    pub results: Vec<Option<AssessmentResult>>,
}

impl Snapshot {
    /// @acp:summary "Read all three matrices for the given table dimensions"
    pub fn read(
        fields: &dyn FieldSpace,
        goal_count: usize,
        method_count: usize,
        row_count: usize,
    ) -> Self {
        Self {
            goal_count,
            method_count,
            ratings: read_support_ratings(fields, row_count, goal_count),
            overrides: read_strength_overrides(fields, goal_count),
            methods: read_assessment_weights(fields, method_count, goal_count),
            results: read_assessment_results(fields, method_count),
        }
    }

    /// Row-scanned strength for a 1-based goal
    pub fn row_strength(&self, goal: usize) -> f64 {
        let Some(index) = goal.checked_sub(1) else {
            return 0.0;
        };
        self.ratings
            .iter()
            .filter_map(|row| row.get(index))
            .map(|rating| rating.value())
            .sum()
    }

    pub fn override_for(&self, goal: usize) -> StrengthOverride {
        goal.checked_sub(1)
            .and_then(|i| self.overrides.get(i))
            .copied()
            .unwrap_or_default()
    }
}

/// Goal count from `goalCount`, clamped to `1..=max`
pub fn read_goal_count(fields: &dyn FieldSpace, default: usize, max: usize) -> usize {
    let max = max.max(1);
    fields
        .text(&FieldId::GoalCount)
        .and_then(parse_count)
        .unwrap_or(default)
        .clamp(1, max)
}

/// Method count from `methodCount`, capped at `max`
pub fn read_method_count(fields: &dyn FieldSpace, default: usize, max: usize) -> usize {
    fields
        .text(&FieldId::MethodCount)
        .and_then(parse_count)
        .unwrap_or(default)
        .min(max)
}

/// Indicator row count from `indicatorRowCount`, or by probing rows
///
/// Never exceeds `max`.
pub fn read_indicator_row_count(fields: &dyn FieldSpace, max: usize) -> usize {
    if let Some(count) = fields.text(&FieldId::IndicatorRowCount).and_then(parse_count) {
        return count.min(max);
    }
    let mut row = 0;
    while row < max
        && (fields.contains(&FieldId::SupportCell { row, col: 0 })
            || fields.contains(&FieldId::SupportCategory { row }))
    {
        row += 1;
    }
    row
}

/// Physical column of a 1-based goal in an indicator row
///
/// Rows that open a category carry one extra leading cell.
pub fn goal_column(fields: &dyn FieldSpace, row: usize, goal: usize) -> usize {
    if fields.contains(&FieldId::SupportCategory { row }) {
        goal + 1
    } else {
        goal
    }
}

/// @acp:summary "Read H/M/L ratings for every indicator row and goal"
pub fn read_support_ratings(
    fields: &dyn FieldSpace,
    row_count: usize,
    goal_count: usize,
) -> Vec<Vec<Rating>> {
    (0..row_count)
        .map(|row| {
            (1..=goal_count)
                .map(|goal| {
                    let col = goal_column(fields, row, goal);
                    fields
                        .get(&FieldId::SupportCell { row, col })
                        .map(Rating::from_token)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

/// Read the direct-entry strength fields per goal
pub fn read_strength_overrides(fields: &dyn FieldSpace, goal_count: usize) -> Vec<StrengthOverride> {
    let number = |id: FieldId| fields.text(&id).map(parse_number);
    (1..=goal_count)
        .map(|goal| StrengthOverride {
            h_count: number(FieldId::TargetHCount { goal }),
            m_count: number(FieldId::TargetMCount { goal }),
            l_count: number(FieldId::TargetLCount { goal }),
            strength: number(FieldId::TargetStrength { goal }),
        })
        .collect()
}

/// @acp:summary "Read method scores and the method x goal weight matrix"
pub fn read_assessment_weights(
    fields: &dyn FieldSpace,
    method_count: usize,
    goal_count: usize,
) -> Vec<AssessmentMethod> {
    (1..=method_count)
        .map(|method| AssessmentMethod {
            score: fields
                .get(&FieldId::MethodScore { method })
                .map(parse_number)
                .unwrap_or(0.0),
            weights: (1..=goal_count)
                .map(|goal| {
                    fields
                        .get(&FieldId::MethodWeight { method, goal })
                        .map(parse_weight)
                        .unwrap_or(0.0)
                })
                .collect(),
        })
        .collect()
}

/// @acp:summary "Read full and average scores per method"
///
/// The results table's total mirrors the method score; when the total
/// is blank the method score is used instead.
pub fn read_assessment_results(
    fields: &dyn FieldSpace,
    method_count: usize,
) -> Vec<Option<AssessmentResult>> {
    (1..=method_count)
        .map(|method| {
            let total = FieldId::ResultTotal { method };
            let full = fields
                .text(&total)
                .or_else(|| fields.text(&FieldId::MethodScore { method }))
                .or_else(|| fields.get(&total))?;
            let avg = fields.get(&FieldId::ResultAverage { method })?;
            Some(AssessmentResult {
                full_score: parse_number(full),
                avg_score: parse_number(avg),
            })
        })
        .collect()
}
