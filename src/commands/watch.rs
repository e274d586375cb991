//! @acp:module "Watch Command"
//! @acp:summary "Recompute a field space file whenever it changes"
//! @acp:domain cli
//! @acp:layer handler
//!
//! File events are coalesced through the same debouncer the editor uses,
//! so a burst of saves produces one recompute.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use console::style;
use ::notify::{EventKind, RecursiveMode, Watcher};

use super::compute::compute_file;
use crate::config::Config;
use crate::notify::{Notifier, TracingNotifier};
use crate::schedule::Debouncer;

/// Options for the watch command
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Field space file to watch
    pub input: PathBuf,
    /// Where derived fields are written
    pub output: PathBuf,
}

impl WatchOptions {
    /// Output next to the input: `report.json` -> `report.results.json`
    pub fn default_output(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "report".to_string());
        input.with_file_name(format!("{}.results.json", stem))
    }
}

fn recompute_to(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let (fields, report) = compute_file(input, config, Some(notifier))?;
    fields
        .derived()
        .write_json(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let overall = report
        .overall
        .map(|o| format!("{:.*}", config.display_decimals, o))
        .unwrap_or_else(|| config.overall_placeholder.clone());
    println!(
        "{} Recomputed {} goals, overall {}",
        style("✓").green(),
        report.goal_count,
        overall
    );
    Ok(())
}

/// Execute the watch command
pub async fn execute_watch(options: WatchOptions, config: Config) -> Result<()> {
    if options.input == options.output {
        bail!("Output must differ from the watched file");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut watcher = ::notify::recommended_watcher(move |res: ::notify::Result<::notify::Event>| {
        match res {
            Ok(event) if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) => {
                let _ = tx.send(());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("watch error: {}", e),
        }
    })?;
    watcher
        .watch(&options.input, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", options.input.display()))?;

    println!(
        "{} Watching {} (writing {})",
        style("→").cyan(),
        options.input.display(),
        options.output.display()
    );

    if let Err(e) = recompute_to(&options.input, &options.output, &config) {
        eprintln!("{} {:#}", style("✗").red(), e);
    }

    let debouncer = Debouncer::new(config.debounce_window());
    loop {
        tokio::select! {
            event = rx.recv() => {
                if event.is_none() {
                    break;
                }
                let input = options.input.clone();
                let output = options.output.clone();
                let config = config.clone();
                debouncer.schedule(move || {
                    // file I/O stays off the async workers
                    tokio::task::spawn_blocking(move || {
                        if let Err(e) = recompute_to(&input, &output, &config) {
                            eprintln!("{} {:#}", style("✗").red(), e);
                        }
                    });
                });
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{} Stopped watching", style("✓").green());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            WatchOptions::default_output(Path::new("reports/cs101.json")),
            PathBuf::from("reports/cs101.results.json")
        );
    }
}
