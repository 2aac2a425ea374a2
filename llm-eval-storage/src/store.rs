//! Filesystem-backed result store.
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/raw/<run_id>/<task_id>_<sanitized_model>_<strategy>.json
//! <base>/reports/<run_id>_summary.json
//! <base>/reports/<run_id>_results.csv
//! ```
//!
//! A run is a directory; its existence is the only manifest. Saving the
//! same (task, model, strategy) triple twice in a run overwrites.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use llm_eval_core::{EvalError, EvaluationResult, Result};

use crate::csv;
use crate::summary::RunSummary;

/// AND-conjunction of optional filters for loading results.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    pub run_id: Option<String>,
    pub task_id: Option<String>,
    pub model_name: Option<String>,
    pub strategy: Option<String>,
}

impl ResultFilter {
    pub fn for_run(run_id: impl Into<String>) -> Self {
        Self {
            run_id: Some(run_id.into()),
            ..Default::default()
        }
    }

    fn matches(&self, result: &EvaluationResult) -> bool {
        self.task_id.as_deref().is_none_or(|t| result.task_id == t)
            && self
                .model_name
                .as_deref()
                .is_none_or(|m| result.model_name == m)
            && self.strategy.as_deref().is_none_or(|s| result.strategy == s)
    }
}

#[derive(Debug, Clone)]
pub struct ResultStore {
    base_path: PathBuf,
    raw_dir: PathBuf,
    reports_dir: PathBuf,
}

impl ResultStore {
    /// Open (and create) the storage tree. Failure to create the
    /// directories is fatal at initialization.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        let raw_dir = base_path.join("raw");
        let reports_dir = base_path.join("reports");

        fs::create_dir_all(&raw_dir)?;
        fs::create_dir_all(&reports_dir)?;

        info!(base = %base_path.display(), "result store initialized");
        Ok(Self {
            base_path,
            raw_dir,
            reports_dir,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.raw_dir.join(run_id)
    }

    /// Persist one result as pretty JSON. Last write wins for a repeated
    /// triple within the same run.
    pub fn save_result(&self, result: &EvaluationResult, run_id: &str) -> Result<PathBuf> {
        let run_dir = self.run_dir(run_id);
        fs::create_dir_all(&run_dir)?;

        let path = run_dir.join(result.file_name());
        let json = serde_json::to_string_pretty(result)?;
        fs::write(&path, json)?;

        debug!(path = %path.display(), "saved result");
        Ok(path)
    }

    /// Load results matching the filter. One run directory when `run_id`
    /// is set, otherwise all of them. Unparseable files are skipped with a
    /// warning; they never fail the whole load.
    pub fn load_results(&self, filter: &ResultFilter) -> Result<Vec<EvaluationResult>> {
        let search_dirs: Vec<PathBuf> = match &filter.run_id {
            Some(run_id) => vec![self.run_dir(run_id)],
            None => self.run_dirs()?,
        };

        let mut results = Vec::new();
        for dir in search_dirs {
            if !dir.is_dir() {
                continue;
            }
            let mut entries: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            // Directory iteration order is platform-dependent.
            entries.sort();

            for path in entries {
                match self.load_result_file(&path) {
                    Ok(result) => {
                        if filter.matches(&result) {
                            results.push(result);
                        }
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable result");
                    }
                }
            }
        }

        info!(count = results.len(), "loaded results");
        Ok(results)
    }

    fn load_result_file(&self, path: &Path) -> Result<EvaluationResult> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Export results as CSV, one row per result. An empty set writes no
    /// file and returns 0. Returns the number of rows written.
    pub fn export_csv(&self, output_path: &Path, run_id: Option<&str>) -> Result<usize> {
        let filter = ResultFilter {
            run_id: run_id.map(str::to_string),
            ..Default::default()
        };
        let results = self.load_results(&filter)?;

        if results.is_empty() {
            warn!("no results to export");
            return Ok(0);
        }

        let mut lines = Vec::with_capacity(results.len() + 1);
        lines.push(csv::header_row());
        for result in &results {
            lines.push(csv::result_row(result));
        }
        fs::write(output_path, lines.join("\n") + "\n")?;

        info!(count = results.len(), path = %output_path.display(), "exported CSV");
        Ok(results.len())
    }

    /// Summary statistics over a run (or all runs). `None` when nothing is
    /// stored.
    pub fn summary(&self, run_id: Option<&str>) -> Result<Option<RunSummary>> {
        let filter = ResultFilter {
            run_id: run_id.map(str::to_string),
            ..Default::default()
        };
        let results = self.load_results(&filter)?;
        Ok(RunSummary::from_results(&results))
    }

    /// Write the summary JSON and the CSV report for a run.
    pub fn save_summary_report(&self, run_id: &str) -> Result<()> {
        let report_path = self.reports_dir.join(format!("{run_id}_summary.json"));
        match self.summary(Some(run_id))? {
            Some(summary) => {
                fs::write(&report_path, serde_json::to_string_pretty(&summary)?)?;
            }
            None => {
                warn!(run_id, "no results found; writing empty summary marker");
                let marker = serde_json::json!({ "error": "No results found" });
                fs::write(&report_path, serde_json::to_string_pretty(&marker)?)?;
            }
        }
        info!(path = %report_path.display(), "summary report saved");

        let csv_path = self.reports_dir.join(format!("{run_id}_results.csv"));
        self.export_csv(&csv_path, Some(run_id))?;
        Ok(())
    }

    /// Recompute `total_score` from the scores mapping for every result in
    /// a run, rewriting only files whose stored total disagrees. Returns
    /// the number of files rewritten; calling it again with no intervening
    /// edits rewrites zero.
    pub fn recompute_totals(&self, run_id: &str) -> Result<usize> {
        let run_dir = self.run_dir(run_id);
        if !run_dir.is_dir() {
            return Err(EvalError::NotFound(format!("Run '{run_id}' not found")));
        }

        let mut updated = 0;
        for entry in fs::read_dir(&run_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let mut result = match self.load_result_file(&path) {
                Ok(r) => r,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable result");
                    continue;
                }
            };

            let Some(expected) = result.computed_total() else {
                continue;
            };
            if result.total_score == Some(expected) {
                continue;
            }

            result.total_score = Some(expected);
            fs::write(&path, serde_json::to_string_pretty(&result)?)?;
            debug!(path = %path.display(), total = expected, "updated total score");
            updated += 1;
        }

        info!(run_id, updated, "recomputed total scores");
        Ok(updated)
    }

    /// Most recently modified run directory, by filesystem mtime.
    pub fn latest_run_id(&self) -> Result<Option<String>> {
        let mut latest: Option<(std::time::SystemTime, String)> = None;
        for dir in self.run_dirs()? {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let mtime = fs::metadata(&dir)?.modified()?;
            if latest.as_ref().is_none_or(|(t, _)| mtime > *t) {
                latest = Some((mtime, name.to_string()));
            }
        }
        Ok(latest.map(|(_, name)| name))
    }

    fn run_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.raw_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}
