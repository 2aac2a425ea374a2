//! Client for a local Ollama-style text-generation HTTP service.
//!
//! One call is one prompt and one completion. There is no retry logic:
//! the generation service is local, and a failed call is recorded by the
//! orchestrator rather than retried.

pub mod client;
pub mod config;
pub mod error;

pub use client::{GenerateResponse, GenerationParams, OllamaClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
