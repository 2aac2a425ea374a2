//! Evaluation matrix construction.

use tracing::info;

use llm_eval_core::{ModelConfig, Task};

/// One scheduled (task, model, strategy) triple.
#[derive(Debug, Clone)]
pub struct MatrixCell {
    pub task: Task,
    pub model: ModelConfig,
    pub strategy: String,
}

/// The full execution plan for a run, in execution order, plus the tasks
/// that were excluded for being incomplete.
#[derive(Debug, Clone, Default)]
pub struct EvaluationMatrix {
    pub cells: Vec<MatrixCell>,
    pub skipped_tasks: Vec<String>,
}

impl EvaluationMatrix {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Build the matrix: task-major, then model, then that model's supported
/// strategies. This order is both the execution order and the display
/// order; there is no reordering.
///
/// Incomplete tasks are skipped entirely and collected for reporting.
pub fn build_matrix(tasks: &[Task], models: &[ModelConfig]) -> EvaluationMatrix {
    let mut matrix = EvaluationMatrix::default();

    for task in tasks {
        if !task.is_complete() {
            info!(task_id = %task.id, "skipping incomplete task");
            matrix.skipped_tasks.push(task.id.clone());
            continue;
        }

        for model in models {
            for strategy in &model.supported_strategies {
                matrix.cells.push(MatrixCell {
                    task: task.clone(),
                    model: model.clone(),
                    strategy: strategy.clone(),
                });
            }
        }
    }

    matrix
}
