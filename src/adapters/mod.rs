//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for asking an external
//! text-generation service a question and getting back plain text.

pub mod perplexity;

use async_trait::async_trait;
use thiserror::Error;

// Re-export the Perplexity adapter
pub use perplexity::{PerplexityClient, PerplexitySettings};

/// Failures talking to a text-generation service
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response format: {0}")]
    MalformedResponse(String),

    #[error("response contained no content")]
    EmptyContent,
}

/// Trait for text-generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text
    async fn ask(&self, prompt: &str, system_prompt: &str) -> Result<String, AdapterError>;
}
