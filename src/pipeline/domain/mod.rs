//! Domain model for pipeline runs.

mod error;
mod ids;
mod record;
mod run;
mod status;

pub use error::{
    ErrorCategory, ParseTaskStatusError, PipelineDomainError, PipelineError, PipelineErrorKind,
    PipelineStage,
};
pub use ids::RunId;
pub use record::{Artifact, InfoResult, InfoResultError, StatusUpdate};
pub use run::{PipelineRun, StatusChange};
pub use status::TaskStatus;
