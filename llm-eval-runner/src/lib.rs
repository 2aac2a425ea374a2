//! Evaluation-run orchestration.
//!
//! The evaluator builds the task x model x strategy matrix, executes it
//! strictly sequentially against the generation service, and persists one
//! record per attempted cell.

pub mod evaluator;
pub mod matrix;

pub use evaluator::{CellOutcome, Evaluator, RunReport};
pub use matrix::{build_matrix, EvaluationMatrix, MatrixCell};
