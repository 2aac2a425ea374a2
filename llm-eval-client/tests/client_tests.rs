use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llm_eval_client::{ClientConfig, ClientError, GenerationParams, OllamaClient};

fn params(max_tokens: i64) -> GenerationParams {
    GenerationParams {
        temperature: 0.7,
        top_p: 0.9,
        max_tokens,
    }
}

async fn client_for(server: &MockServer) -> OllamaClient {
    OllamaClient::new(ClientConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn generate_parses_response_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "The answer is 4.",
            "done": true,
            "prompt_eval_count": 12,
            "eval_count": 7,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .generate("qwen2.5:1.5b", "What is 2+2?", &params(-1))
        .await
        .unwrap();

    assert_eq!(result.response, "The answer is 4.");
    assert!(result.done);
    assert_eq!(result.prompt_eval_count, 12);
    assert_eq!(result.eval_count, 7);
}

#[tokio::test]
async fn unbounded_sentinel_omits_num_predict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok", "done": true,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.generate("m", "p", &params(-1)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "m");
    assert_eq!(body["stream"], false);
    assert!(body["options"].get("num_predict").is_none());
    assert_eq!(body["options"]["temperature"], 0.7);
    assert_eq!(body["options"]["top_p"], 0.9);
}

#[tokio::test]
async fn bounded_max_tokens_sets_num_predict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok", "done": true,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.generate("m", "p", &params(2048)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["options"]["num_predict"], 2048);
}

#[tokio::test]
async fn empty_response_is_returned_not_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "", "done": true, "eval_count": 512,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.generate("deepseek-r1:7b", "p", &params(-1)).await.unwrap();
    assert_eq!(result.response, "");
    assert_eq!(result.eval_count, 512);
}

#[tokio::test]
async fn connection_refused_is_a_connection_error() {
    // Nothing listens on this port.
    let config = ClientConfig::new("http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(2))
        .with_connect_timeout(Duration::from_secs(2));
    let client = OllamaClient::new(config).unwrap();

    let err = client.generate("m", "p", &params(-1)).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Connection { .. } | ClientError::Timeout(_)),
        "unexpected error kind: {err:?}"
    );
}

#[tokio::test]
async fn http_error_status_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model load failed"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate("m", "p", &params(-1)).await.unwrap_err();
    match err {
        ClientError::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "model load failed");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.generate("m", "p", &params(-1)).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn ping_reflects_reachability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": []})))
        .mount(&server)
        .await;

    assert!(client_for(&server).await.ping().await);

    let unreachable = OllamaClient::new(
        ClientConfig::new("http://127.0.0.1:1").with_connect_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    assert!(!unreachable.ping().await);
}

#[tokio::test]
async fn list_models_and_availability() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "qwen2.5:1.5b"}, {"name": "deepseek-r1:7b"}],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(
        client.list_models().await.unwrap(),
        vec!["qwen2.5:1.5b", "deepseek-r1:7b"]
    );
    assert!(client.is_model_available("qwen2.5:1.5b").await);
    assert!(!client.is_model_available("llama3:8b").await);
}
