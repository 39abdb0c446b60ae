//! Chat-completion access for report generation.
//!
//! The rest of the crate only sees [`LlmProvider`]; [`OpenAIProvider`] talks to
//! any service that implements the OpenAI chat completions API.

mod openai;
mod provider;
mod types;

pub use openai::{OpenAIProvider, DEFAULT_LLM_MODEL};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
