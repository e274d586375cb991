//! @acp:module "Output Formatting"
//! @acp:summary "Human-readable rendering of pass reports and issues"
//! @acp:domain cli
//! @acp:layer handler

use console::style;

use crate::engine::{PassReport, StageOutcome};
use crate::notify::{Notification, Severity};
use crate::validation::ValidationIssue;

/// Colored marker for a stage outcome
pub fn format_stage(outcome: &StageOutcome) -> String {
    match outcome {
        StageOutcome::Applied => format!("{} applied", style("✓").green()),
        StageOutcome::Skipped { reason } => format!("{} skipped: {}", style("-").dim(), reason),
        StageOutcome::Invalid { reason } => format!("{} invalid: {}", style("!").yellow(), reason),
        StageOutcome::Failed { error } => format!("{} failed: {}", style("✗").red(), error),
    }
}

fn severity_marker(severity: Severity) -> String {
    match severity {
        Severity::Info => style("i").cyan().to_string(),
        Severity::Warning => style("!").yellow().to_string(),
        Severity::Error => style("✗").red().to_string(),
    }
}

/// Print goal table, overall score and stage outcomes
pub fn print_report(report: &PassReport, decimals: usize, placeholder: &str) {
    println!(
        "{} {} goals, {} methods ({} engine)",
        style("→").cyan(),
        report.goal_count,
        report.method_count,
        report.engine
    );
    println!();
    println!("  {:<6} {:>10} {:>12}", "Goal", "Weight", "Achievement");
    for goal in 1..=report.goal_count {
        let weight = report
            .weights
            .as_ref()
            .map(|w| format!("{:.*}", decimals, w.weight(goal)))
            .unwrap_or_else(|| "-".to_string());
        let achievement = report
            .achievements
            .as_ref()
            .map(|a| format!("{:.*}", decimals, a.achievement(goal)))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<6} {:>10} {:>12}", goal, weight, achievement);
    }
    if let Some(weights) = &report.weights {
        println!("  {:<6} {:>10}", "Total", weights.total_strength);
    }
    println!();

    let overall = report
        .overall
        .map(|o| format!("{:.*}", decimals, o))
        .unwrap_or_else(|| placeholder.to_string());
    println!("  Overall achievement: {}", style(overall).bold());
    println!();
    println!("  Weights:      {}", format_stage(&report.weight_stage));
    println!("  Achievements: {}", format_stage(&report.achievement_stage));
    println!("  Overall:      {}", format_stage(&report.overall_stage));
}

pub fn print_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        let scope = issue
            .method
            .map(|m| format!("method {}: ", m))
            .unwrap_or_default();
        println!("  {} {}{}", severity_marker(issue.severity), scope, issue.message);
    }
}

pub fn print_notifications(items: &[Notification]) {
    for item in items {
        eprintln!(
            "{} {}: {}",
            severity_marker(item.severity),
            item.title,
            item.message
        );
    }
}
