use std::time::Duration;

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Local generation can be slow, so the request timeout is a generous
/// multi-minute bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Short timeout for the connectivity probe and catalog queries.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for [`crate::OllamaClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_ollama() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.timeout, Duration::from_secs(600));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("http://10.0.0.2:11434")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.base_url, "http://10.0.0.2:11434");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
