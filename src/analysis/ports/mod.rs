//! Port definitions for analysis collaborators.

mod llm;

pub use llm::{CompletionRequest, LlmClient, LlmError, LlmResult};

#[cfg(test)]
pub use llm::MockLlmClient;
