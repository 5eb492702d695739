//! vulcan model linter - Entry Point
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Report passed |
//! | 1 | Violations at or above `fail_on`, or rules that could not evaluate (`--keep-going`) |
//! | 2 | Configuration or loading failure, or a rule that could not evaluate without `--keep-going` |

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use vulcan_lint::logging::{init_logging, log_config_loaded};
use vulcan_lint::{ConfigLoader, LintMode, Reporter, lint_project};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Command line interface for the vulcan model linter
#[derive(Parser, Debug)]
#[command(name = "vlint")]
#[command(about = "Lint vulcan model definitions for data quality conventions")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root (overrides `project.root`)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Report rules that cannot evaluate instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Evaluate models in parallel (implies --keep-going)
    #[arg(long)]
    parallel: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn mode(&self) -> LintMode {
        if self.parallel {
            LintMode::Parallel
        } else if self.keep_going {
            LintMode::KeepGoing
        } else {
            LintMode::FailFast
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    if let Some(root) = &cli.project {
        config.project.root.clone_from(root);
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(true);
    }

    init_logging(&config.logging)?;
    log_config_loaded(loader.source_path().as_deref());

    let report = lint_project(&config, cli.mode())
        .await
        .with_context(|| format!("Failed to lint {}", config.project.root.display()))?;

    match cli.format {
        OutputFormat::Human => print!("{}", Reporter::to_human_readable(&report)),
        OutputFormat::Json => println!("{}", Reporter::to_json(&report)),
    }
    tracing::debug!(passed = report.summary.passed, "Report written");
    Ok(report.summary.passed)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("vlint: {error:#}");
            ExitCode::from(2)
        }
    }
}
