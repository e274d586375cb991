//! @acp:module "Check Command"
//! @acp:summary "Report gate state and data problems of a field space file"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;

use super::output::print_issues;
use crate::config::Config;
use crate::engine::build_engine;
use crate::fields::MemoryFields;
use crate::gate::GateState;
use crate::notify::Severity;
use crate::reader::Snapshot;
use crate::validation::{validate, ValidationIssue};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Field space file to check
    pub input: PathBuf,
}

/// Gate state and validation issues of a field space
pub fn check_fields(fields: &MemoryFields, config: &Config) -> (GateState, Vec<ValidationIssue>) {
    let engine = build_engine(config.clone(), None);
    let snapshot = Snapshot::read(
        fields,
        engine.goal_count(fields),
        engine.method_count(fields),
        engine.row_count(fields),
    );
    let gates = GateState::evaluate(&snapshot, config.results_gate);
    (gates, validate(&snapshot, config.expected_score_total))
}

fn gate_line(label: &str, open: bool) {
    if open {
        println!("  {} {}", style("✓").green(), label);
    } else {
        println!("  {} {}", style("-").dim(), label);
    }
}

/// Execute the check command
pub fn execute_check(options: CheckOptions, config: Config) -> Result<()> {
    let fields = MemoryFields::from_json(&options.input)
        .with_context(|| format!("Failed to load field space from {}", options.input.display()))?;
    let (gates, issues) = check_fields(&fields, &config);

    println!("{} {}", style("→").cyan(), options.input.display());
    gate_line("support ratings complete", gates.support);
    gate_line("assessment weights complete", gates.weights);
    gate_line("assessment results complete", gates.results);
    println!();

    if issues.is_empty() {
        println!("{} No problems found", style("✓").green());
        return Ok(());
    }

    print_issues(&issues);
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{} error(s) found in {}", errors, options.input.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldId;

    #[test]
    fn test_check_fields_reports_gates_and_issues() {
        let fields = MemoryFields::new()
            .with(FieldId::MethodCount, "1")
            .with(FieldId::MethodScore { method: 1 }, "100")
            .with(FieldId::ResultAverage { method: 1 }, "120");

        let (gates, issues) = check_fields(&fields, &Config::default());
        assert!(!gates.support);
        assert!(gates.weights);
        assert!(gates.results);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
