//! HTTP client implementation for the Ollama generation API.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use llm_eval_core::ModelConfig;

use crate::config::{ClientConfig, PROBE_TIMEOUT};
use crate::error::{ClientError, ClientResult};

/// Sampling parameters for one generation call, taken from a model's
/// configuration.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    /// `-1` means unbounded; see [`llm_eval_core::MAX_TOKENS_UNBOUNDED`].
    pub max_tokens: i64,
}

impl GenerationParams {
    pub fn from_model(model: &ModelConfig) -> Self {
        Self {
            temperature: model.temperature,
            top_p: model.top_p,
            max_tokens: model.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
    // The service treats an explicit -1 differently from an absent key, so
    // "unbounded" is expressed by omitting the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i64>,
}

/// Response from the generation endpoint. Token counts are absent in some
/// service versions and default to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: u64,
    #[serde(default)]
    pub eval_count: u64,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: String,
}

/// Synchronous-in-spirit client: one request in flight at a time, awaited
/// to completion, no retries.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl OllamaClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        url::Url::parse(&config.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Generate a completion for one prompt.
    ///
    /// An empty response body is not an error: reasoning models can spend
    /// their whole output budget deliberating, and the record must still be
    /// persisted. It is returned as-is with a logged warning.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> ClientResult<GenerateResponse> {
        let url = self.url("api/generate");
        let payload = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: params.temperature,
                top_p: params.top_p,
                num_predict: (params.max_tokens != -1).then_some(params.max_tokens),
            },
        };

        info!(model, max_tokens = params.max_tokens, "generating");
        debug!(prompt_chars = prompt.len(), "prompt size");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                ClientError::from_reqwest(e, &self.config.base_url, self.config.timeout.as_secs())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !result.done {
            warn!(model, "generation may not be complete (done=false)");
        }
        if result.response.trim().is_empty() {
            warn!(
                model,
                eval_count = result.eval_count,
                "empty response text; the model may have exhausted its output budget \
                 on internal deliberation"
            );
        }

        info!(model, tokens = result.eval_count, "generation complete");
        Ok(result)
    }

    /// Cheap connectivity probe against the catalog endpoint. Never errors.
    pub async fn ping(&self) -> bool {
        let url = self.url("api/tags");
        match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("generation service reachable");
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "probe got an error status");
                false
            }
            Err(e) => {
                warn!(error = %e, url, "probe failed");
                false
            }
        }
    }

    /// Names of the models the service has available.
    pub async fn list_models(&self) -> ClientResult<Vec<String>> {
        let url = self.url("api/tags");
        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                ClientError::from_reqwest(e, &self.config.base_url, PROBE_TIMEOUT.as_secs())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        info!(count = models.len(), "listed available models");
        Ok(models)
    }

    /// Whether a given wire name is available on the service.
    pub async fn is_model_available(&self, model: &str) -> bool {
        match self.list_models().await {
            Ok(models) => models.iter().any(|m| m == model),
            Err(e) => {
                warn!(error = %e, model, "availability check failed");
                false
            }
        }
    }
}
