//! Task catalog commands

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::Cell;

use llm_eval_core::TaskCatalog;

use crate::output;

/// Task catalog commands
#[derive(Debug, Args)]
pub struct TasksCommands {
    #[command(subcommand)]
    pub command: TasksSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksSubcommand {
    /// List the authored tasks
    List,

    /// Report unauthored or placeholder content per task
    Validate,
}

pub fn execute(cmd: TasksCommands) -> Result<()> {
    match cmd.command {
        TasksSubcommand::List => list(),
        TasksSubcommand::Validate => validate(),
    }
}

fn list() -> Result<()> {
    let catalog = TaskCatalog::new();

    let mut table = output::table(&["ID", "Name", "Category", "Complete", "Max Score"]);
    for task in catalog.all() {
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.name),
            Cell::new(&task.category),
            Cell::new(output::yes_no(task.is_complete())),
            Cell::new(task.max_score()),
        ]);
    }
    println!("{table}");
    println!(
        "\n{} {} task(s)",
        "Total:".bold(),
        catalog.all().len().to_string().green()
    );
    Ok(())
}

fn validate() -> Result<()> {
    let catalog = TaskCatalog::new();
    let report = catalog.validation_report();

    let mut table = output::table(&["ID", "Status", "Incomplete Fields"]);
    for task in catalog.all() {
        let fields = report.get(&task.id).map(|f| f.join(", ")).unwrap_or_default();
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(output::status_badge(task.is_complete())),
            Cell::new(fields),
        ]);
    }
    println!("{table}");

    let complete = catalog.count_complete();
    let incomplete = catalog.count_incomplete();
    if incomplete == 0 {
        output::success(&format!("All {complete} task(s) are ready to run"));
    } else {
        output::warning(&format!(
            "{complete} task(s) ready, {incomplete} excluded from runs until authored"
        ));
    }
    Ok(())
}
