//! Domain model for ticket analysis.

mod error;
mod level;
mod result;

pub use error::AnalysisError;
pub use level::Level;
pub use result::{
    AnalysisResult, CollectedFields, HEURISTIC_CONFIDENCE, LLM_CONFIDENCE, field,
};
