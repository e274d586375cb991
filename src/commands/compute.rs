//! @acp:module "Compute Command"
//! @acp:summary "Run one recompute pass over a field space file"
//! @acp:domain cli
//! @acp:layer handler

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use super::check::check_fields;
use super::output::{print_notifications, print_report};
use crate::config::Config;
use crate::engine::{build_engine, PassReport};
use crate::fields::MemoryFields;
use crate::notify::{CollectingNotifier, Notifier};
use crate::validation::report_issues;

/// Options for the compute command
#[derive(Debug, Clone)]
pub struct ComputeOptions {
    /// Field space file to read
    pub input: PathBuf,
    /// Write derived fields back
    pub write: bool,
    /// Destination for `write`; defaults to the input file
    pub output: Option<PathBuf>,
    /// Print the pass report as JSON
    pub json: bool,
}

/// Load, recompute and return the updated field space with its report
///
/// Validation issues of the loaded data go to the notifier as well.
pub fn compute_file(
    input: &Path,
    config: &Config,
    notifier: Option<Arc<dyn Notifier>>,
) -> Result<(MemoryFields, PassReport)> {
    let mut fields = MemoryFields::from_json(input)
        .with_context(|| format!("Failed to load field space from {}", input.display()))?;
    if let Some(notifier) = &notifier {
        let (_, issues) = check_fields(&fields, config);
        report_issues(&issues, notifier.as_ref());
    }
    let engine = build_engine(config.clone(), notifier);
    let report = engine.recompute(&mut fields);
    Ok((fields, report))
}

/// Execute the compute command
pub fn execute_compute(options: ComputeOptions, config: Config) -> Result<()> {
    let notifier = Arc::new(CollectingNotifier::new());
    let (fields, report) = compute_file(
        &options.input,
        &config,
        Some(notifier.clone() as Arc<dyn Notifier>),
    )?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, config.display_decimals, &config.overall_placeholder);
    }
    print_notifications(&notifier.take());

    if options.write {
        let target = options.output.unwrap_or(options.input);
        fields
            .write_json(&target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        if !options.json {
            println!();
            println!("{} Wrote {}", style("✓").green(), target.display());
        }
    }

    Ok(())
}
