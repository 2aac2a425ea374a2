//! Report command: recompute totals and regenerate reports for a run

use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};
use clap::Args;

use llm_eval_storage::ResultStore;

use crate::commands::run::print_summary;
use crate::output;

/// Rebuild the summary and CSV for a finished run
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Run id, e.g. run_2025-01-15_10-30-00
    pub run_id: Option<String>,

    /// Use the most recent run
    #[arg(long, conflicts_with = "run_id")]
    pub latest: bool,
}

pub fn execute(results_dir: &Path, args: ReportArgs) -> Result<()> {
    let store = ResultStore::new(results_dir)
        .with_context(|| format!("Could not initialize results under {}", results_dir.display()))?;

    let run_id = match (args.run_id, args.latest) {
        (Some(id), _) => id,
        (None, true) => store
            .latest_run_id()?
            .ok_or_else(|| anyhow!("No runs found under {}", store.raw_dir().display()))?,
        (None, false) => bail!("Provide a RUN_ID or pass --latest"),
    };

    // Pick up scores a human entered into the raw files since the run.
    let updated = store.recompute_totals(&run_id)?;
    if updated > 0 {
        output::info(&format!("Recomputed totals in {updated} file(s)"));
    }
    store.save_summary_report(&run_id)?;

    let summary = store
        .summary(Some(run_id.as_str()))?
        .ok_or_else(|| anyhow!("Run {run_id} contains no results"))?;
    print_summary(&run_id, &summary);

    output::success(&format!(
        "Reports written to {}",
        store.reports_dir().display()
    ));
    Ok(())
}
