//! Error types for analysis.

use crate::analysis::ports::LlmError;
use thiserror::Error;

/// Failure of the analysis engine.
///
/// Every variant means no result was produced; partially populated results
/// are never returned.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// The LLM call failed.
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    /// The engine's own deadline elapsed before the LLM answered.
    #[error("LLM call exceeded {0:?}")]
    Timeout(std::time::Duration),

    /// The response contained no balanced JSON object.
    #[error("LLM response contains no JSON object")]
    NoJsonObject,

    /// The isolated span is not valid JSON.
    #[error("LLM response JSON is invalid: {0}")]
    InvalidJson(String),

    /// The isolated JSON is valid but not an object.
    #[error("LLM response JSON is not an object")]
    NotAnObject,
}

impl AnalysisError {
    /// Returns `true` when the error comes from malformed model output
    /// rather than from the call itself.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::NoJsonObject | Self::InvalidJson(_) | Self::NotAnObject
        )
    }
}
