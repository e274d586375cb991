#![forbid(unsafe_code)]
//! Achieve Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use achieve::commands::{
    execute_check, execute_compute, execute_init, execute_watch, CheckOptions, ComputeOptions,
    InitOptions, WatchOptions,
};
use achieve::config::DEFAULT_CONFIG_FILE;
use achieve::Config;

#[derive(Parser)]
#[command(name = "achieve")]
#[command(about = "Course achievement engine - goal weights, goal achievement and overall attainment")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty report field space
    Init {
        /// Field space file to create
        #[arg(default_value = "report.json")]
        path: PathBuf,

        /// Number of course goals
        #[arg(long, default_value_t = 4)]
        goals: usize,

        /// Number of assessment methods
        #[arg(long, default_value_t = 4)]
        methods: usize,

        /// Number of indicator rows in the support table
        #[arg(long, default_value_t = 6)]
        rows: usize,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Recompute derived values once
    Compute {
        /// Field space file
        #[arg(default_value = "report.json")]
        input: PathBuf,

        /// Write derived fields back
        #[arg(short, long)]
        write: bool,

        /// Write to this file instead of the input
        #[arg(short, long, requires = "write")]
        output: Option<PathBuf>,

        /// Output the pass report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show gate state and data problems
    Check {
        /// Field space file
        #[arg(default_value = "report.json")]
        input: PathBuf,
    },

    /// Recompute whenever the field space file changes
    Watch {
        /// Field space file to watch
        #[arg(default_value = "report.json")]
        input: PathBuf,

        /// Results file (default: <input>.results.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "achieve=debug" } else { "achieve=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config
    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} Invalid config {}: {}",
                style("✗").red(),
                cli.config.display(),
                e
            );
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Init { path, goals, methods, rows, force } => {
            let options = InitOptions { path, goals, methods, rows, force };
            execute_init(options)?;
        }

        Commands::Compute { input, write, output, json } => {
            let options = ComputeOptions { input, write, output, json };
            execute_compute(options, config)?;
        }

        Commands::Check { input } => {
            let options = CheckOptions { input };
            execute_check(options, config)?;
        }

        Commands::Watch { input, output } => {
            let output = output.unwrap_or_else(|| WatchOptions::default_output(&input));
            let options = WatchOptions { input, output };
            execute_watch(options, config).await?;
        }
    }

    Ok(())
}
