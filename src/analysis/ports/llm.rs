//! LLM completion port.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for LLM completion calls.
pub type LlmResult<T> = Result<T, LlmError>;

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Prompt text.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Deadline the client should honour.
    pub timeout: Duration,
}

/// Text completion contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Completes a prompt and returns the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] when the call fails or times out.
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String>;
}

/// Errors returned by LLM clients.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// The client's own deadline elapsed.
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    /// The provider refused the request.
    #[error("completion rejected: {0}")]
    Rejected(String),

    /// Transport or provider failure.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl LlmError {
    /// Wraps a provider error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
