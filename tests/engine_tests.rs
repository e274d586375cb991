//! Recompute pipeline integration tests
//!
//! Drives the engines through the field space the way the editor does.

use std::collections::HashSet;
use std::sync::Arc;

use achieve::{
    build_engine, AchieveError, CalculationEngine, CollectingNotifier, Config, DynamicEngine,
    EngineKind, FieldId, FieldSpace, MemoryFields, Notifier, ResultsGatePolicy, Severity,
    StageOutcome, StaticEngine,
};
use pretty_assertions::assert_eq;

// =============================================================================
// Fixtures
// =============================================================================

/// Support table where each row opens its own category
fn with_ratings(mut fields: MemoryFields, rows: &[&[&str]]) -> MemoryFields {
    for (row, ratings) in rows.iter().enumerate() {
        fields.insert(FieldId::SupportCategory { row }, format!("Category {}", row));
        fields.insert(FieldId::SupportCell { row, col: 0 }, format!("Category {}", row));
        fields.insert(FieldId::SupportCell { row, col: 1 }, format!("{}.1", row + 1));
        for (i, token) in ratings.iter().enumerate() {
            fields.insert(FieldId::SupportCell { row, col: i + 2 }, *token);
        }
    }
    fields
}

/// One method per entry: (full score, average, weights per goal)
fn with_methods(mut fields: MemoryFields, methods: &[(&str, &str, &[&str])]) -> MemoryFields {
    fields.insert(FieldId::MethodCount, methods.len().to_string());
    for (i, (full, avg, weights)) in methods.iter().enumerate() {
        let method = i + 1;
        fields.insert(FieldId::MethodScore { method }, *full);
        fields.insert(FieldId::ResultTotal { method }, *full);
        fields.insert(FieldId::ResultAverage { method }, *avg);
        for (g, weight) in weights.iter().enumerate() {
            fields.insert(FieldId::MethodWeight { method, goal: g + 1 }, *weight);
        }
    }
    fields
}

fn complete_report() -> MemoryFields {
    let fields = MemoryFields::new().with(FieldId::GoalCount, "3");
    let fields = with_ratings(fields, &[&["H", "M", "L"], &["H", "L", "M"]]);
    with_methods(
        fields,
        &[
            ("40", "32", &["50%", "30%", "20%"]),
            ("60", "45", &["0.5", "0.3", "0.2"]),
        ],
    )
}

fn engine() -> Box<dyn CalculationEngine> {
    build_engine(Config::default(), None)
}

fn text(fields: &MemoryFields, id: FieldId) -> Option<&str> {
    fields.get(&id)
}

/// Field space that refuses writes to some keys
struct GuardedFields {
    inner: MemoryFields,
    read_only: HashSet<String>,
}

impl FieldSpace for GuardedFields {
    fn get(&self, id: &FieldId) -> Option<&str> {
        self.inner.get(id)
    }

    fn set(&mut self, id: &FieldId, value: String) -> achieve::Result<()> {
        if self.read_only.contains(&id.to_string()) {
            return Err(AchieveError::ReadOnlyField {
                key: id.to_string(),
            });
        }
        self.inner.set(id, value)
    }

    fn remove(&mut self, id: &FieldId) -> Option<String> {
        self.inner.remove(id)
    }
}

// =============================================================================
// Example scenarios
// =============================================================================

mod scenario_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strengths_three_two_one_zero() {
        let fields = MemoryFields::new().with(FieldId::GoalCount, "4");
        let mut fields = with_ratings(fields, &[&["H", "M", "L", ""]]);

        let report = engine().recompute(&mut fields);

        assert_eq!(report.weights.as_ref().unwrap().total_strength, 6.0);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 1 }), Some("0.500"));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 2 }), Some("0.333"));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 3 }), Some("0.167"));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 4 }), Some("0.000"));
        assert_eq!(text(&fields, FieldId::GoalWeightMirror { goal: 2 }), Some("0.333"));
        assert_eq!(text(&fields, FieldId::TotalWeight), Some("6"));
    }

    #[test]
    fn test_single_method_achievement() {
        let fields = MemoryFields::new().with(FieldId::GoalCount, "1");
        let mut fields = with_methods(fields, &[("100", "85", &["100%"])]);

        let report = engine().recompute(&mut fields);

        assert_eq!(report.achievement_stage, StageOutcome::Applied);
        assert_eq!(text(&fields, FieldId::GoalAchievement { goal: 1 }), Some("0.850"));
        assert_eq!(
            text(&fields, FieldId::GoalAchievementMirror { goal: 1 }),
            Some("0.850")
        );
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        // strengths 5/3/2 -> weights 0.5/0.3/0.2
        let fields = MemoryFields::new()
            .with(FieldId::GoalCount, "3")
            .with(FieldId::TargetStrength { goal: 1 }, "5")
            .with(FieldId::TargetStrength { goal: 2 }, "3")
            .with(FieldId::TargetStrength { goal: 3 }, "2");
        let mut fields = with_methods(
            fields,
            &[
                ("50", "40", &["1", "0", "0"]),
                ("25", "15", &["0", "1", "0"]),
                ("25", "22.5", &["0", "0", "1"]),
            ],
        );

        let report = engine().recompute(&mut fields);

        assert_eq!(report.achievements.as_ref().unwrap().values, vec![0.8, 0.6, 0.9]);
        assert!((report.overall.unwrap() - 0.76).abs() < 1e-9);
        assert_eq!(text(&fields, FieldId::OverallAchievement), Some("0.760"));
        assert_eq!(text(&fields, FieldId::OverallAchievementMirror), Some("0.760"));
    }

    #[test]
    fn test_empty_ratings_reset_overall() {
        let fields = MemoryFields::new()
            .with(FieldId::GoalCount, "2")
            .with(FieldId::OverallAchievement, "0.812");
        let fields = with_ratings(fields, &[&["", ""], &["", ""]]);
        let mut fields = with_methods(fields, &[("100", "70", &["0.5", "0.5"])]);

        let report = engine().recompute(&mut fields);

        assert_eq!(report.weights, None);
        assert!(matches!(report.weight_stage, StageOutcome::Skipped { .. }));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 1 }), None);
        assert_eq!(text(&fields, FieldId::OverallAchievement), Some("0.00"));
    }

    #[test]
    fn test_weight_token_conventions() {
        let fields = MemoryFields::new().with(FieldId::GoalCount, "3");
        let mut fields = with_methods(fields, &[("100", "100", &["30%", "0.3", "30"])]);

        let report = engine().recompute(&mut fields);

        assert_eq!(report.achievements.unwrap().values, vec![0.3, 0.3, 0.3]);
    }
}

// =============================================================================
// Properties
// =============================================================================

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_weights_sum_to_one() {
        let cases: &[&[&[&str]]] = &[
            &[&["H", "M", "L"]],
            &[&["h", "", "m"], &["L", "L", "L"], &["", "", "H"]],
            &[&["Low", "Medium", "High"], &["x", "H", ""]],
        ];
        for rows in cases {
            let fields = MemoryFields::new().with(FieldId::GoalCount, "3");
            let mut fields = with_ratings(fields, rows);
            let report = engine().recompute(&mut fields);
            let sum = report.weights.unwrap().sum();
            assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
        }
    }

    #[test]
    fn test_zero_strength_yields_no_weights() {
        let fields = MemoryFields::new()
            .with(FieldId::GoalCount, "2")
            .with(FieldId::TargetStrength { goal: 1 }, "0")
            .with(FieldId::TargetHCount { goal: 2 }, "0");
        let mut fields = with_ratings(fields, &[&["n/a", "-"]]);

        let report = engine().recompute(&mut fields);

        assert_eq!(report.weights, None);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 1 }), None);
        assert_eq!(text(&fields, FieldId::TotalWeight), None);
    }

    #[test]
    fn test_achievement_monotonic_in_average() {
        let mut previous: Option<Vec<f64>> = None;
        for avg in ["10", "20", "35", "50", "60"] {
            let fields = MemoryFields::new().with(FieldId::GoalCount, "3");
            let mut fields = with_methods(
                fields,
                &[("60", avg, &["0.6", "0", "0.4"]), ("40", "20", &["0.4", "1", "0.6"])],
            );
            let values = engine().recompute(&mut fields).achievements.unwrap().values;

            if let Some(prev) = &previous {
                assert!(values[0] > prev[0]);
                assert_eq!(values[1], prev[1]);
                assert!(values[2] > prev[2]);
            }
            previous = Some(values);
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut fields = complete_report();
        let engine = engine();

        let first_report = engine.recompute(&mut fields);
        let first_fields = fields.clone();
        let second_report = engine.recompute(&mut fields);

        assert_eq!(first_report, second_report);
        assert_eq!(first_fields, fields);
    }

    #[test]
    fn test_weights_independent_of_assessment_data() {
        let mut complete = complete_report();
        let mut broken = complete_report();
        broken.insert(FieldId::ResultAverage { method: 1 }, "garbage");
        broken.remove(&FieldId::ResultTotal { method: 2 });
        broken.remove(&FieldId::MethodScore { method: 2 });
        broken.insert(FieldId::MethodWeight { method: 1, goal: 1 }, "???");

        let a = engine().recompute(&mut complete);
        let b = engine().recompute(&mut broken);

        assert_eq!(a.weights, b.weights);
        assert!(b.achievements.is_none());
    }

    #[test]
    fn test_achievements_independent_of_ratings() {
        let mut complete = complete_report();
        let mut unrated = with_ratings(complete_report(), &[&["", "", ""], &["", "", ""]]);

        let a = engine().recompute(&mut complete);
        let b = engine().recompute(&mut unrated);

        assert_eq!(a.achievements, b.achievements);
        assert!(b.weights.is_none());
    }

    #[test]
    fn test_overall_gated_on_every_matrix() {
        let drop_support = |f: &mut MemoryFields| {
            for col in 2..5 {
                f.insert(FieldId::SupportCell { row: 0, col }, "");
                f.insert(FieldId::SupportCell { row: 1, col }, "");
            }
        };
        let drop_scores = |f: &mut MemoryFields| {
            f.insert(FieldId::MethodScore { method: 1 }, "0");
            f.insert(FieldId::MethodScore { method: 2 }, "");
        };
        let drop_results = |f: &mut MemoryFields| {
            f.remove(&FieldId::ResultAverage { method: 2 });
        };
        let mutations: [&dyn Fn(&mut MemoryFields); 3] = [&drop_support, &drop_scores, &drop_results];

        for mutate in mutations {
            let mut fields = complete_report();
            engine().recompute(&mut fields);
            assert_ne!(text(&fields, FieldId::OverallAchievement), Some("0.00"));

            mutate(&mut fields);
            let report = engine().recompute(&mut fields);

            assert_eq!(report.overall, None);
            assert_eq!(text(&fields, FieldId::OverallAchievement), Some("0.00"));
            assert_eq!(text(&fields, FieldId::OverallAchievementMirror), Some("0.00"));
        }
    }
}

// =============================================================================
// Gating policy and fault isolation
// =============================================================================

mod policy_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_average_allowed_by_default() {
        let mut fields = complete_report();
        fields.insert(FieldId::ResultAverage { method: 2 }, "0");

        let report = engine().recompute(&mut fields);
        assert!(report.gates.results);
        assert!(report.overall.is_some());
    }

    #[test]
    fn test_zero_average_blocks_under_strict_policy() {
        let config = Config {
            results_gate: ResultsGatePolicy::RequirePositiveAverage,
            ..Config::default()
        };
        let mut fields = complete_report();
        fields.insert(FieldId::ResultAverage { method: 2 }, "0");

        let report = build_engine(config, None).recompute(&mut fields);
        assert!(!report.gates.results);
        assert_eq!(report.achievements, None);
        assert_eq!(text(&fields, FieldId::OverallAchievement), Some("0.00"));
    }

    #[test]
    fn test_failed_write_isolated_to_its_stage() {
        let notifier = Arc::new(CollectingNotifier::new());
        let engine = build_engine(Config::default(), Some(notifier.clone() as Arc<dyn Notifier>));
        let mut inner = complete_report();
        for id in [
            FieldId::GoalWeight { goal: 1 },
            FieldId::GoalWeightMirror { goal: 2 },
            FieldId::TotalWeight,
        ] {
            inner.insert(id, "OLD");
        }
        let mut fields = GuardedFields {
            inner,
            read_only: HashSet::from(["summaryWeight2".to_string()]),
        };

        let report = engine.recompute(&mut fields);

        assert!(matches!(report.weight_stage, StageOutcome::Failed { .. }));
        assert_eq!(report.achievement_stage, StageOutcome::Applied);
        assert!(matches!(report.overall_stage, StageOutcome::Skipped { .. }));
        assert!(!report.is_clean());
        assert_eq!(fields.get(&FieldId::OverallAchievement), Some("0.00"));

        // the weight stage wrote nothing
        assert_eq!(fields.get(&FieldId::GoalWeight { goal: 1 }), Some("OLD"));
        assert_eq!(fields.get(&FieldId::GoalWeightMirror { goal: 1 }), None);
        assert_eq!(fields.get(&FieldId::GoalWeight { goal: 2 }), None);
        assert_eq!(fields.get(&FieldId::GoalWeightMirror { goal: 2 }), Some("OLD"));
        assert_eq!(fields.get(&FieldId::TotalWeight), Some("OLD"));

        let items = notifier.take();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].severity, Severity::Error);
        assert!(items[0].message.contains("summaryWeight2"));
    }

    #[test]
    fn test_negative_override_keeps_support_closed() {
        let notifier = Arc::new(CollectingNotifier::new());
        let engine = build_engine(Config::default(), Some(notifier.clone() as Arc<dyn Notifier>));
        let mut fields = MemoryFields::new()
            .with(FieldId::GoalCount, "1")
            .with(FieldId::TargetStrength { goal: 1 }, "-2");

        let report = engine.recompute(&mut fields);

        assert!(!report.gates.support);
        assert!(matches!(report.weight_stage, StageOutcome::Skipped { .. }));
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_missing_notifier_is_fine() {
        let mut fields = GuardedFields {
            inner: complete_report(),
            read_only: HashSet::from(["goalAchievement1".to_string()]),
        };
        let report = engine().recompute(&mut fields);
        assert!(matches!(report.achievement_stage, StageOutcome::Failed { .. }));
        assert!(report.weight_stage.is_applied());
        assert_eq!(fields.get(&FieldId::GoalAchievementMirror { goal: 1 }), None);
        assert_eq!(fields.get(&FieldId::GoalAchievement { goal: 2 }), None);
    }

    #[test]
    fn test_huge_method_count_is_capped() {
        let mut fields = complete_report();
        fields.insert(FieldId::MethodCount, usize::MAX.to_string());

        let report = engine().recompute(&mut fields);

        assert_eq!(report.method_count, Config::default().max_methods);
        assert!(report.weight_stage.is_applied());
        // methods past the second have no results
        assert!(!report.gates.results);
        assert_eq!(text(&fields, FieldId::OverallAchievement), Some("0.00"));
    }

    #[test]
    fn test_huge_indicator_row_count_is_capped() {
        let mut expected = complete_report();
        let expected = engine().recompute(&mut expected);

        let mut fields = complete_report();
        fields.insert(FieldId::IndicatorRowCount, "10000000000");
        let report = engine().recompute(&mut fields);

        assert_eq!(report.weights, expected.weights);
        assert_eq!(report.overall, expected.overall);
    }

    #[test]
    fn test_ratings_past_goal_count_ignored() {
        let fields = MemoryFields::new().with(FieldId::GoalCount, "2");
        let mut fields = with_ratings(fields, &[&["H", "M", "H", "H"]]);

        let report = engine().recompute(&mut fields);

        let weights = report.weights.unwrap();
        assert_eq!(weights.total_strength, 5.0);
        assert_eq!(weights.goal_count(), 2);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 1 }), Some("0.600"));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 2 }), Some("0.400"));
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 3 }), None);
    }
}

// =============================================================================
// Engine strategies
// =============================================================================

mod strategy_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_engine_selects_strategy() {
        let config = Config {
            engine: EngineKind::Static,
            ..Config::default()
        };
        assert_eq!(build_engine(config, None).kind(), EngineKind::Static);
        assert_eq!(build_engine(Config::default(), None).kind(), EngineKind::Dynamic);
    }

    #[test]
    fn test_static_engine_ignores_goal_count() {
        let mut fields = complete_report();
        let report = StaticEngine::new(Config::default(), None).recompute(&mut fields);

        assert_eq!(report.goal_count, 4);
        assert_eq!(report.weights.unwrap().weights[3], 0.0);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 4 }), Some("0.000"));
    }

    #[test]
    fn test_dynamic_engine_follows_goal_count() {
        let engine = DynamicEngine::new(Config::default(), None);
        let mut fields = complete_report();
        engine.recompute(&mut fields);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 3 }), Some("0.250"));

        fields.insert(FieldId::GoalCount, "2");
        let report = engine.on_structure_changed(&mut fields);

        assert_eq!(report.goal_count, 2);
        assert_eq!(text(&fields, FieldId::GoalWeight { goal: 3 }), None);
        assert_eq!(text(&fields, FieldId::GoalAchievement { goal: 3 }), None);
        assert!((report.weights.unwrap().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_fields_survive_recompute() {
        let mut fields = complete_report();
        fields.insert_raw("courseName", "Data Structures");

        engine().recompute(&mut fields);

        assert!(fields.iter().any(|(k, v)| k == "courseName" && v == "Data Structures"));
    }
}
