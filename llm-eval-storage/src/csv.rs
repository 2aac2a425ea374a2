//! Minimal CSV writing for result exports. Quoting follows RFC 4180:
//! fields containing commas, quotes or newlines are wrapped in double
//! quotes with embedded quotes doubled.

use llm_eval_core::EvaluationResult;

/// Column order for exported result rows. Matches the persisted JSON field
/// order so the CSV and the raw files line up.
pub const CSV_HEADER: &[&str] = &[
    "task_id",
    "model_name",
    "strategy",
    "prompt",
    "response",
    "timestamp",
    "model_config",
    "generation_time_ms",
    "prompt_tokens",
    "completion_tokens",
    "scores",
    "total_score",
    "evaluator_notes",
];

pub fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Flatten one result into a CSV row. Mapping-typed fields are serialized
/// as their JSON text; absent optional fields become empty cells.
pub fn result_row(result: &EvaluationResult) -> String {
    let model_config =
        serde_json::to_string(&result.model_config).unwrap_or_else(|_| String::new());
    let scores = result
        .scores
        .as_ref()
        .and_then(|s| serde_json::to_string(s).ok())
        .unwrap_or_default();
    let total_score = result
        .total_score
        .map(|t| t.to_string())
        .unwrap_or_default();
    let notes = result.evaluator_notes.clone().unwrap_or_default();

    [
        escape(&result.task_id),
        escape(&result.model_name),
        escape(&result.strategy),
        escape(&result.prompt),
        escape(&result.response),
        escape(&result.timestamp),
        escape(&model_config),
        result.generation_time_ms.to_string(),
        result.prompt_tokens.to_string(),
        result.completion_tokens.to_string(),
        escape(&scores),
        total_score,
        escape(&notes),
    ]
    .join(",")
}

pub fn header_row() -> String {
    CSV_HEADER.join(",")
}
