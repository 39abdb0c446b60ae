use super::types::{CompletionResponse, Message};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Sampling settings for one completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: Some(1000),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Errors that can occur when talking to an LLM provider.
///
/// These are shown to the user as-is; nothing retries them.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name, e.g. "openai".
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Send the conversation and return the model's reply.
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError>;
}
