//! Run command: execute the evaluation matrix

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use clap::Args;
use colored::Colorize;
use comfy_table::Cell;

use llm_eval_client::{ClientConfig, OllamaClient};
use llm_eval_core::{ModelCatalog, ModelConfig, Task, TaskCatalog};
use llm_eval_runner::Evaluator;
use llm_eval_storage::ResultStore;

use crate::output;

/// Run the full task x model x strategy matrix
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Comma-separated task ids to run (default: all)
    #[arg(long, value_delimiter = ',')]
    pub tasks: Option<Vec<String>>,

    /// Comma-separated model keys to run (default: all)
    #[arg(long, value_delimiter = ',')]
    pub models: Option<Vec<String>>,

    /// Skip the connectivity probe before running
    #[arg(long)]
    pub skip_validation: bool,
}

pub async fn execute(base_url: &str, results_dir: &Path, args: RunArgs) -> Result<()> {
    let task_catalog = TaskCatalog::new();
    let model_catalog = ModelCatalog::new();

    let tasks: Vec<Task> = match &args.tasks {
        Some(ids) => ids
            .iter()
            .filter_map(|id| {
                let task = task_catalog.get(id);
                if task.is_none() {
                    output::warning(&format!("Unknown task id '{id}', skipping"));
                }
                task.cloned()
            })
            .collect(),
        None => task_catalog.all().to_vec(),
    };
    if tasks.is_empty() {
        bail!("No tasks selected");
    }

    let models: Vec<ModelConfig> = match &args.models {
        Some(keys) => keys
            .iter()
            .filter_map(|key| match model_catalog.get(key) {
                Ok(model) => Some(model.clone()),
                Err(e) => {
                    output::warning(&e.to_string());
                    None
                }
            })
            .collect(),
        None => model_catalog.all().into_iter().cloned().collect(),
    };
    if models.is_empty() {
        bail!("No models selected");
    }

    print_plan(&tasks, &models);

    let strategies_per_task: usize = models.iter().map(|m| m.supported_strategies.len()).sum();
    let runnable = tasks.iter().filter(|t| t.is_complete()).count();
    let total = runnable * strategies_per_task;
    if total == 0 {
        bail!("No complete tasks to run; see `llm-eval tasks validate`");
    }

    let client = OllamaClient::new(ClientConfig::new(base_url))
        .with_context(|| format!("Invalid generation service URL: {base_url}"))?;
    let store = ResultStore::new(results_dir)
        .with_context(|| format!("Could not initialize results under {}", results_dir.display()))?;
    let evaluator = Evaluator::new(client, store.clone());

    let spinner = output::spinner(&format!("Running {total} evaluation(s)..."));
    let report = evaluator.run(&tasks, &models, args.skip_validation).await;
    spinner.finish_and_clear();
    let report = report?;

    print_outcomes(&report);

    if report.failed == 0 {
        output::success(&format!(
            "Run {} complete: {}/{} succeeded",
            report.run_id, report.succeeded, report.total_cells
        ));
    } else {
        output::warning(&format!(
            "Run {} complete: {}/{} succeeded, {} failed",
            report.run_id, report.succeeded, report.total_cells, report.failed
        ));
    }

    if let Some(summary) = store.summary(Some(report.run_id.as_str()))? {
        print_summary(&report.run_id, &summary);
    }
    output::info(&format!(
        "Reports written to {}",
        store.reports_dir().display()
    ));
    Ok(())
}

fn print_plan(tasks: &[Task], models: &[ModelConfig]) {
    output::print_section("Evaluation Plan");

    let mut table = output::table(&["Task", "Status", "Models x Strategies"]);
    let cells_per_task: usize = models.iter().map(|m| m.supported_strategies.len()).sum();
    for task in tasks {
        let cells = if task.is_complete() {
            cells_per_task.to_string()
        } else {
            "skipped (incomplete)".yellow().to_string()
        };
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(output::status_badge(task.is_complete())),
            Cell::new(cells),
        ]);
    }
    println!("{table}");
}

fn print_outcomes(report: &llm_eval_runner::RunReport) {
    output::print_section("Results");

    let mut table = output::table(&["Task", "Model", "Strategy", "Status", "Time (ms)", "Error"]);
    for outcome in &report.outcomes {
        table.add_row(vec![
            Cell::new(&outcome.task_id),
            Cell::new(&outcome.model_name),
            Cell::new(&outcome.strategy),
            Cell::new(output::status_badge(outcome.success)),
            Cell::new(outcome.generation_time_ms),
            Cell::new(outcome.error.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{table}");
}

pub(crate) fn print_summary(run_id: &str, summary: &llm_eval_storage::RunSummary) {
    output::print_section(&format!("Summary for {run_id}"));
    output::print_field("Total evaluations", &summary.total_evaluations.to_string());
    output::print_field("Tasks", &summary.tasks.join(", "));
    output::print_field("Models", &summary.models.join(", "));
    output::print_field("Strategies", &summary.strategies.join(", "));
    output::print_field(
        "Total generation time",
        &format!("{:.1}s", summary.total_generation_time_sec),
    );
    output::print_field(
        "Average generation time",
        &format!("{:.1}s", summary.average_generation_time_sec),
    );
    output::print_field(
        "Tokens generated",
        &summary.total_tokens_generated.to_string(),
    );
    output::print_field("Scored", &summary.evaluated_results.to_string());
    output::print_field("Pending scoring", &summary.pending_evaluation.to_string());
}
