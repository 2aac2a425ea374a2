use std::collections::BTreeMap;
use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llm_eval_client::{ClientConfig, OllamaClient};
use llm_eval_core::{ModelConfig, SizeCategory, Task, TaskExample, ERROR_MARKER};
use llm_eval_runner::Evaluator;
use llm_eval_storage::{ResultFilter, ResultStore};

fn complete_task(id: &str) -> Task {
    Task {
        id: id.to_string(),
        name: "Arithmetic".to_string(),
        category: "Math".to_string(),
        description: "Solve the problem and state the answer.".to_string(),
        evaluation_input: "What is 17 * 4?".to_string(),
        expected_output_characteristics: "A correct numeric answer.".to_string(),
        development_examples: vec![TaskExample::new("What is 2 + 2?", "4")],
        evaluation_criteria: BTreeMap::from([(
            "correctness".to_string(),
            "The final answer is right".to_string(),
        )]),
        scoring_rubric: BTreeMap::from([("correctness".to_string(), 10)]),
    }
}

fn incomplete_task(id: &str) -> Task {
    let mut task = complete_task(id);
    task.evaluation_input = "TODO: write the actual problem".to_string();
    task
}

fn model(strategies: &[&str]) -> ModelConfig {
    ModelConfig {
        name: "qwen2.5:1.5b".to_string(),
        display_name: "Qwen 2.5 1.5B".to_string(),
        size_category: SizeCategory::Small,
        is_reasoning_model: false,
        parameters: "1.5B".to_string(),
        supported_strategies: strategies.iter().map(|s| s.to_string()).collect(),
        temperature: 0.7,
        top_p: 0.9,
        max_tokens: -1,
    }
}

fn evaluator(base_url: &str, dir: &TempDir) -> Evaluator {
    let client = OllamaClient::new(ClientConfig::new(base_url)).unwrap();
    let store = ResultStore::new(dir.path()).unwrap();
    Evaluator::new(client, store)
}

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "The answer is 68.",
            "done": true,
            "prompt_eval_count": 25,
            "eval_count": 12
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn run_persists_one_file_per_cell() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot", "few_shot"])], false)
        .await
        .unwrap();

    assert_eq!(report.total_cells, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 0);

    let run_dir = dir.path().join("raw").join(&report.run_id);
    let mut names: Vec<String> = fs::read_dir(&run_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "math_qwen2.5_1.5b_few_shot.json",
            "math_qwen2.5_1.5b_zero_shot.json",
        ]
    );
}

#[tokio::test]
async fn run_writes_summary_report_and_csv() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot"])], false)
        .await
        .unwrap();

    let reports = dir.path().join("reports");
    assert!(reports.join(format!("{}_summary.json", report.run_id)).exists());
    assert!(reports.join(format!("{}_results.csv", report.run_id)).exists());
}

#[tokio::test]
async fn results_carry_token_counts_from_the_service() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot"])], false)
        .await
        .unwrap();

    let store = ResultStore::new(dir.path()).unwrap();
    let results = store
        .load_results(&ResultFilter::for_run(&report.run_id))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].response, "The answer is 68.");
    assert_eq!(results[0].prompt_tokens, 25);
    assert_eq!(results[0].completion_tokens, 12);
    assert!(results[0].scores.is_none());
}

#[tokio::test]
async fn incomplete_tasks_are_reported_not_executed() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let tasks = [complete_task("math"), incomplete_task("draft")];
    let report = evaluator.run(&tasks, &[model(&["zero_shot"])], false).await.unwrap();

    assert_eq!(report.total_cells, 1);
    assert_eq!(report.skipped_tasks, vec!["draft".to_string()]);
}

#[tokio::test]
async fn failed_health_check_aborts_with_no_results() {
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator("http://127.0.0.1:1", &dir);

    let result = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot"])], false)
        .await;
    assert!(result.is_err());

    let raw = dir.path().join("raw");
    assert_eq!(fs::read_dir(&raw).unwrap().count(), 0);
}

#[tokio::test]
async fn generation_failure_is_recorded_and_the_run_continues() {
    let dir = TempDir::new().unwrap();
    // Unreachable service, health check skipped.
    let evaluator = evaluator("http://127.0.0.1:1", &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot", "few_shot"])], true)
        .await
        .unwrap();

    assert_eq!(report.total_cells, 2);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 2);

    let store = ResultStore::new(dir.path()).unwrap();
    let results = store
        .load_results(&ResultFilter::for_run(&report.run_id))
        .unwrap();
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.response.starts_with(ERROR_MARKER));
        assert!(result.is_failed());
        assert_eq!(result.prompt_tokens, 0);
        assert_eq!(result.completion_tokens, 0);
        // The prompt was built before the call failed.
        assert!(!result.prompt.is_empty());
    }

    // The summary still covers the failed run.
    assert!(dir
        .path()
        .join("reports")
        .join(format!("{}_summary.json", report.run_id))
        .exists());
}

#[tokio::test]
async fn http_error_fails_only_the_affected_cell() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["zero_shot"])], false)
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    let outcome = &report.outcomes[0];
    assert!(!outcome.success);
    assert!(outcome.error.as_deref().unwrap().contains("500"));
}

#[tokio::test]
async fn unknown_strategy_yields_a_persisted_error_record() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let report = evaluator
        .run(&[complete_task("math")], &[model(&["self_consistency"])], false)
        .await
        .unwrap();

    assert_eq!(report.total_cells, 1);
    assert_eq!(report.failed, 1);

    let store = ResultStore::new(dir.path()).unwrap();
    let results = store
        .load_results(&ResultFilter::for_run(&report.run_id))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].response.contains("Unknown strategy 'self_consistency'"));
    assert!(results[0].prompt.is_empty());
}

#[tokio::test]
async fn run_single_returns_without_persisting() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let result = evaluator
        .run_single(&complete_task("math"), &model(&["zero_shot"]), "zero_shot")
        .await
        .unwrap();

    assert_eq!(result.response, "The answer is 68.");
    assert!(result.prompt.contains("What is 17 * 4?"));

    let raw = dir.path().join("raw");
    assert_eq!(fs::read_dir(&raw).unwrap().count(), 0);
}

#[tokio::test]
async fn run_single_rejects_an_unknown_strategy() {
    let server = mock_service().await;
    let dir = TempDir::new().unwrap();
    let evaluator = evaluator(&server.uri(), &dir);

    let result = evaluator
        .run_single(&complete_task("math"), &model(&["zero_shot"]), "tree_of_thought")
        .await;
    assert!(result.is_err());
}
