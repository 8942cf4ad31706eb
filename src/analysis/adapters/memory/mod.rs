//! In-memory analysis adapters.

mod llm;

pub use llm::ScriptedLlmClient;
