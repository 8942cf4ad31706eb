//! Analysis strategies and the engine that selects between them.

mod engine;
mod extract;
mod heuristic;
mod llm_analyzer;
mod prompt;

pub use engine::AnalysisEngine;
pub use extract::first_json_object;
pub use heuristic::{DEFAULT_THEME, HeuristicAnalyzer, themes};
pub use llm_analyzer::{LlmAnalyzer, parse_response};
pub use prompt::{MAX_PROMPT_VALUE_LEN, build_prompt};

pub(crate) use prompt::capitalize;
