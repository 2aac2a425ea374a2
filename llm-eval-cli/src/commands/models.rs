//! Model catalog commands

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::Cell;

use llm_eval_core::ModelCatalog;

use crate::output;

/// Model catalog commands
#[derive(Debug, Args)]
pub struct ModelsCommands {
    #[command(subcommand)]
    pub command: ModelsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ModelsSubcommand {
    /// List the configured models
    List,
}

pub fn execute(cmd: ModelsCommands) -> Result<()> {
    match cmd.command {
        ModelsSubcommand::List => list(),
    }
}

fn list() -> Result<()> {
    let catalog = ModelCatalog::new();

    let mut table = output::table(&[
        "Key",
        "Model",
        "Display Name",
        "Parameters",
        "Reasoning",
        "Strategies",
        "Max Tokens",
    ]);
    for (key, model) in catalog.entries() {
        let max_tokens = if model.is_unbounded() {
            "unbounded".to_string()
        } else {
            model.max_tokens.to_string()
        };
        table.add_row(vec![
            Cell::new(key),
            Cell::new(&model.name),
            Cell::new(&model.display_name),
            Cell::new(&model.parameters),
            Cell::new(output::yes_no(model.is_reasoning_model)),
            Cell::new(model.supported_strategies.join(", ")),
            Cell::new(max_tokens),
        ]);
    }
    println!("{table}");
    println!(
        "\n{} {} model(s)",
        "Total:".bold(),
        catalog.len().to_string().green()
    );
    Ok(())
}
