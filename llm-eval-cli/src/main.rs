use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

/// Offline benchmarking harness for local language models.
#[derive(Debug, Parser)]
#[command(name = "llm-eval", version, about)]
struct Cli {
    /// Base URL of the generation service
    #[arg(
        long,
        global = true,
        env = "LLM_EVAL_BASE_URL",
        default_value = "http://localhost:11434"
    )]
    base_url: String,

    /// Directory run results and reports are written under
    #[arg(
        long,
        global = true,
        env = "LLM_EVAL_RESULTS_DIR",
        default_value = "data/results"
    )]
    results_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect and validate the task catalog
    Tasks(commands::tasks::TasksCommands),

    /// Inspect the model catalog
    Models(commands::models::ModelsCommands),

    /// Execute the evaluation matrix against the generation service
    Run(commands::run::RunArgs),

    /// Recompute totals and regenerate the reports for a run
    Report(commands::report::ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug,hyper=info,reqwest=info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Tasks(cmd) => commands::tasks::execute(cmd),
        Command::Models(cmd) => commands::models::execute(cmd),
        Command::Run(args) => {
            commands::run::execute(&cli.base_url, &cli.results_dir, args).await
        }
        Command::Report(args) => commands::report::execute(&cli.results_dir, args),
    }
}
