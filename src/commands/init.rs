//! @acp:module "Init Command"
//! @acp:summary "Create an empty report field space"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `achieve init`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;

use crate::fields::{FieldId, MemoryFields};

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Field space file to create
    pub path: PathBuf,
    /// Number of course goals
    pub goals: usize,
    /// Number of assessment methods
    pub methods: usize,
    /// Number of indicator rows in the support table
    pub rows: usize,
    /// Overwrite an existing file
    pub force: bool,
}

/// Blank cells for every input of a report with the given shape
pub fn template(goals: usize, methods: usize, rows: usize) -> MemoryFields {
    let mut fields = MemoryFields::new()
        .with(FieldId::GoalCount, goals.to_string())
        .with(FieldId::MethodCount, methods.to_string())
        .with(FieldId::IndicatorRowCount, rows.to_string());

    for row in 0..rows {
        // Indicator name in column 0, one rating cell per goal after it
        for col in 0..=goals {
            fields.insert(FieldId::SupportCell { row, col }, "");
        }
    }

    for method in 1..=methods {
        fields.insert(FieldId::MethodScore { method }, "");
        for goal in 1..=goals {
            fields.insert(FieldId::MethodWeight { method, goal }, "");
        }
        fields.insert(FieldId::ResultTotal { method }, "");
        fields.insert(FieldId::ResultAverage { method }, "");
    }

    fields
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.path.exists() && !options.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            style("✗").red(),
            options.path.display()
        );
        bail!("{} already exists", options.path.display());
    }
    if options.goals == 0 {
        bail!("A report needs at least one goal");
    }

    let fields = template(options.goals, options.methods, options.rows);
    fields
        .write_json(&options.path)
        .with_context(|| format!("Failed to write {}", options.path.display()))?;

    println!(
        "{} Created {} ({} goals, {} methods, {} indicator rows)",
        style("✓").green(),
        options.path.display(),
        options.goals,
        options.methods,
        options.rows
    );
    Ok(())
}
