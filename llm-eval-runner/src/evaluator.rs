//! The evaluation orchestrator.

use std::time::Instant;

use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

use llm_eval_client::{GenerationParams, OllamaClient};
use llm_eval_core::{
    EvalError, EvaluationResult, ModelConfig, PromptStrategy, Result, Task, ERROR_MARKER,
};
use llm_eval_storage::ResultStore;

use crate::matrix::{build_matrix, MatrixCell};

/// Outcome of one executed matrix cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellOutcome {
    pub task_id: String,
    pub model_name: String,
    pub strategy: String,
    pub success: bool,
    pub error: Option<String>,
    pub generation_time_ms: u64,
}

/// What happened over a whole run. `total_cells` always equals the matrix
/// size: failed cells are counted, not dropped.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub total_cells: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_tasks: Vec<String>,
    pub outcomes: Vec<CellOutcome>,
}

/// Sequential orchestrator: one generation call in flight at a time, each
/// cell isolated so a failure never aborts the sweep.
pub struct Evaluator {
    client: OllamaClient,
    store: ResultStore,
    run_id: String,
}

impl Evaluator {
    /// Create an evaluator with a fresh timestamp-derived run id.
    pub fn new(client: OllamaClient, store: ResultStore) -> Self {
        let run_id = Local::now().format("run_%Y-%m-%d_%H-%M-%S").to_string();
        info!(run_id = %run_id, "evaluator initialized");
        Self {
            client,
            store,
            run_id,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Execute the full matrix over the given tasks and models.
    ///
    /// Unless `skip_validation` is set, the generation service must answer
    /// a connectivity probe first; a failed probe aborts the run with no
    /// results produced.
    pub async fn run(
        &self,
        tasks: &[Task],
        models: &[ModelConfig],
        skip_validation: bool,
    ) -> Result<RunReport> {
        if !skip_validation && !self.client.ping().await {
            return Err(EvalError::Generation(format!(
                "Could not connect to the generation service at {}. \
                 Make sure it is running (try: ollama serve)",
                self.client.config().base_url
            )));
        }

        let matrix = build_matrix(tasks, models);
        if !matrix.skipped_tasks.is_empty() {
            warn!(
                skipped = matrix.skipped_tasks.len(),
                tasks = %matrix.skipped_tasks.join(", "),
                "skipping incomplete task(s)"
            );
        }

        info!(
            run_id = %self.run_id,
            total = matrix.len(),
            "starting evaluation run"
        );

        let total = matrix.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, cell) in matrix.cells.iter().enumerate() {
            let (result, outcome) = self.execute_cell(cell).await;
            if let Err(e) = self.store.save_result(&result, &self.run_id) {
                error!(
                    task_id = %cell.task.id,
                    model = %cell.model.name,
                    strategy = %cell.strategy,
                    error = %e,
                    "failed to persist result"
                );
            }
            // Progress after every cell, success or not.
            info!(
                completed = index + 1,
                total,
                task_id = %outcome.task_id,
                model = %outcome.model_name,
                strategy = %outcome.strategy,
                success = outcome.success,
                "cell finished"
            );
            outcomes.push(outcome);
        }

        info!(run_id = %self.run_id, "generating summary report");
        self.store.save_summary_report(&self.run_id)?;

        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Ok(RunReport {
            run_id: self.run_id.clone(),
            total_cells: total,
            succeeded,
            failed: total - succeeded,
            skipped_tasks: matrix.skipped_tasks,
            outcomes,
        })
    }

    /// Execute one cell. Never fails: any error becomes a persisted
    /// error-marker record so every attempted cell yields exactly one file.
    async fn execute_cell(&self, cell: &MatrixCell) -> (EvaluationResult, CellOutcome) {
        let result = match self.run_single(&cell.task, &cell.model, &cell.strategy).await {
            Ok(result) => result,
            Err(e) => {
                // Strategy resolution failed: the model catalog references
                // an unknown name. Fatal to this cell only.
                error!(
                    task_id = %cell.task.id,
                    model = %cell.model.name,
                    strategy = %cell.strategy,
                    error = %e,
                    "cell failed before generation"
                );
                EvaluationResult::new(
                    &cell.task.id,
                    &cell.model,
                    &cell.strategy,
                    "",
                    format!("{ERROR_MARKER}{e}"),
                    0,
                    0,
                    0,
                )
            }
        };

        let outcome = CellOutcome {
            task_id: result.task_id.clone(),
            model_name: result.model_name.clone(),
            strategy: result.strategy.clone(),
            success: !result.is_failed(),
            error: result
                .is_failed()
                .then(|| result.response.trim_start_matches(ERROR_MARKER).to_string()),
            generation_time_ms: result.generation_time_ms,
        };
        (result, outcome)
    }

    /// Run one evaluation and return the record without saving it. Useful
    /// for interactive checks. Fails only when the strategy name does not
    /// resolve; a failed generation call still produces a record, with the
    /// response replaced by an error marker and token counts zeroed.
    pub async fn run_single(
        &self,
        task: &Task,
        model: &ModelConfig,
        strategy_name: &str,
    ) -> Result<EvaluationResult> {
        let strategy = PromptStrategy::from_name(strategy_name)?;
        let prompt = strategy.build_prompt(task);
        let params = GenerationParams::from_model(model);

        let start = Instant::now();
        let (response, prompt_tokens, completion_tokens) =
            match self.client.generate(&model.name, &prompt, &params).await {
                Ok(response) => (response.response, response.prompt_eval_count, response.eval_count),
                Err(e) => {
                    error!(task_id = %task.id, model = %model.name, error = %e, "generation failed");
                    (format!("{ERROR_MARKER}{e}"), 0, 0)
                }
            };
        let generation_time_ms = start.elapsed().as_millis() as u64;

        let result = EvaluationResult::new(
            &task.id,
            model,
            strategy_name,
            prompt,
            response,
            generation_time_ms,
            prompt_tokens,
            completion_tokens,
        );

        info!(
            task_id = %task.id,
            model = %model.name,
            strategy = strategy_name,
            ms = generation_time_ms,
            tokens = completion_tokens,
            "completed"
        );
        Ok(result)
    }
}
