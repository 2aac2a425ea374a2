use thiserror::Error;

/// Failure kinds for generation-service calls. Timeout, connection refusal
/// and malformed payloads stay distinguishable so the orchestrator can
/// report them precisely.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Could not connect to the generation service at {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Generation service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid response from the generation service: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Request(reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Classify a transport-level reqwest failure.
    pub(crate) fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(timeout_secs)
        } else if err.is_connect() {
            ClientError::Connection {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Request(err)
        }
    }
}
