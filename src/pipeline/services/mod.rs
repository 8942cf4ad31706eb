//! Pipeline services.

mod dispatcher;
mod orchestrator;

pub use dispatcher::{DispatcherError, SYNTHETIC_NOTICE, TicketDispatcher};
pub use orchestrator::{
    ANALYSIS_ARTIFACT, COMMENT_ARTIFACT, PipelineInput, PipelineOutcome, TaskOrchestrator,
};
