//! @acp:module "Report Validation"
//! @acp:summary "Consistency checks on assessment data, reported but never gating"
//! @acp:domain scoring
//! @acp:layer logic

use serde::{Deserialize, Serialize};

use crate::notify::{Notifier, Severity};
use crate::reader::Snapshot;

const TOLERANCE: f64 = 1e-6;

/// @acp:summary "One problem found in the report data"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// 1-based method the issue belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    fn method(method: usize, severity: Severity, message: String) -> Self {
        Self {
            severity,
            method: Some(method),
            message,
        }
    }
}

/// @acp:summary "Check averages, score totals and weight rows"
pub fn validate(snapshot: &Snapshot, expected_score_total: f64) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut score_total = 0.0;
    let mut any_score = false;

    for index in 0..snapshot.method_count {
        let method = index + 1;
        let declared = snapshot.methods.get(index);
        let result = snapshot.results.get(index).copied().flatten();

        if let Some(result) = result {
            if result.avg_score < 0.0 {
                issues.push(ValidationIssue::method(
                    method,
                    Severity::Error,
                    format!("average score {} is negative", result.avg_score),
                ));
            }
            if result.full_score > 0.0 && result.avg_score > result.full_score + TOLERANCE {
                issues.push(ValidationIssue::method(
                    method,
                    Severity::Error,
                    format!(
                        "average score {} exceeds full score {}",
                        result.avg_score, result.full_score
                    ),
                ));
            }
            if let Some(declared) = declared {
                if declared.score > 0.0 && (declared.score - result.full_score).abs() > TOLERANCE {
                    issues.push(ValidationIssue::method(
                        method,
                        Severity::Warning,
                        format!(
                            "method score {} differs from results total {}",
                            declared.score, result.full_score
                        ),
                    ));
                }
            }
        }

        let full = result
            .map(|r| r.full_score)
            .or_else(|| declared.map(|d| d.score))
            .unwrap_or(0.0);
        if full != 0.0 {
            any_score = true;
        }
        score_total += full;

        if let Some(declared) = declared {
            let weight_sum: f64 = declared.weights.iter().sum();
            if weight_sum > 1.0 + TOLERANCE {
                issues.push(ValidationIssue::method(
                    method,
                    Severity::Warning,
                    format!("goal weights add up to {:.0}%", weight_sum * 100.0),
                ));
            }
        }
    }

    if any_score && (score_total - expected_score_total).abs() > TOLERANCE {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            method: None,
            message: format!(
                "full scores add up to {}, expected {}",
                score_total, expected_score_total
            ),
        });
    }

    issues
}

/// Send every issue to the notifier
pub fn report_issues(issues: &[ValidationIssue], notifier: &dyn Notifier) {
    for issue in issues {
        let title = match issue.method {
            Some(method) => format!("Assessment method {}", method),
            None => "Assessment scores".to_string(),
        };
        notifier.notify(&title, &issue.message, issue.severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::CollectingNotifier;
    use crate::reader::{AssessmentMethod, AssessmentResult};

    fn snapshot(rows: Vec<(f64, f64, f64, Vec<f64>)>) -> Snapshot {
        Snapshot {
            goal_count: 2,
            method_count: rows.len(),
            methods: rows
                .iter()
                .map(|(score, _, _, weights)| AssessmentMethod {
                    score: *score,
                    weights: weights.clone(),
                })
                .collect(),
            results: rows
                .iter()
                .map(|(_, full, avg, _)| {
                    Some(AssessmentResult {
                        full_score: *full,
                        avg_score: *avg,
                    })
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_report_has_no_issues() {
        let s = snapshot(vec![
            (40.0, 40.0, 31.0, vec![0.5, 0.5]),
            (60.0, 60.0, 48.0, vec![0.3, 0.7]),
        ]);
        assert!(validate(&s, 100.0).is_empty());
    }

    #[test]
    fn test_average_above_full_score() {
        let s = snapshot(vec![(100.0, 100.0, 104.0, vec![1.0])]);
        let issues = validate(&s, 100.0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].method, Some(1));
    }

    #[test]
    fn test_score_total_and_weight_sum_warnings() {
        let s = snapshot(vec![(40.0, 40.0, 20.0, vec![0.8, 0.4]), (40.0, 40.0, 20.0, vec![1.0])]);
        let issues = validate(&s, 100.0);

        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("120%"));
        assert_eq!(issues[1].method, None);
        assert!(issues[1].message.contains("80"));
    }

    #[test]
    fn test_method_score_mismatch() {
        let s = snapshot(vec![(40.0, 50.0, 20.0, vec![1.0]), (50.0, 50.0, 20.0, vec![1.0])]);
        let issues = validate(&s, 100.0);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("differs"));
    }

    #[test]
    fn test_report_issues_notifies_each() {
        let notifier = CollectingNotifier::new();
        let s = snapshot(vec![(100.0, 100.0, 120.0, vec![1.5])]);
        report_issues(&validate(&s, 100.0), &notifier);

        let items = notifier.take();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Assessment method 1");
    }
}
