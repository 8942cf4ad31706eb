//! Error types for the pipeline domain.

use super::{InfoResultError, TaskStatus};
use crate::analysis::domain::AnalysisError;
use crate::comment::domain::CommentError;
use crate::ticket::{
    codec::DecodeError,
    domain::TicketTaskError,
    ports::TicketStoreError,
};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the run aggregate.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PipelineDomainError {
    /// The state machine does not allow the requested edge.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Pipeline step an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Turning the input into a ticket task.
    Decode,
    /// Fetching ticket details.
    FetchDetails,
    /// Running the analysis engine.
    Analyze,
    /// Rendering the digest and comment.
    Synthesize,
    /// Posting the comment.
    PostComment,
    /// Encoding the result message.
    EncodeResult,
}

impl PipelineStage {
    /// Returns the stage name used in logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "decode",
            Self::FetchDetails => "fetch_details",
            Self::Analyze => "analyze",
            Self::Synthesize => "synthesize",
            Self::PostComment => "post_comment",
            Self::EncodeResult => "encode_result",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The input was unusable.
    Validation,
    /// A collaborator failed or timed out.
    Collaborator,
    /// Output could not be parsed or produced.
    Format,
    /// The run was cancelled.
    Cancelled,
}

impl ErrorCategory {
    /// Returns the category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Collaborator => "collaborator",
            Self::Format => "format",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong inside a pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineErrorKind {
    /// The transport message held no decodable task.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The assembled task is invalid.
    #[error(transparent)]
    Task(#[from] TicketTaskError),

    /// The ticket store failed.
    #[error(transparent)]
    Store(#[from] TicketStoreError),

    /// The analysis engine failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Comment rendering failed.
    #[error(transparent)]
    Comment(#[from] CommentError),

    /// The run result could not be encoded.
    #[error(transparent)]
    Result(#[from] InfoResultError),

    /// A collaborator call exceeded its deadline.
    #[error("collaborator call exceeded {0:?}")]
    Timeout(Duration),

    /// The run was cancelled.
    #[error("run cancelled")]
    Cancelled,

    /// The state machine refused a transition.
    #[error(transparent)]
    Transition(#[from] PipelineDomainError),
}

/// A pipeline failure tagged with the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage} failed: {kind}")]
pub struct PipelineError {
    stage: PipelineStage,
    #[source]
    kind: PipelineErrorKind,
}

impl PipelineError {
    /// Tags an error with its stage.
    pub fn new(stage: PipelineStage, kind: impl Into<PipelineErrorKind>) -> Self {
        Self {
            stage,
            kind: kind.into(),
        }
    }

    /// Returns the stage the error occurred in.
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Returns the underlying error.
    #[must_use]
    pub const fn kind(&self) -> &PipelineErrorKind {
        &self.kind
    }

    /// Classifies the error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match &self.kind {
            PipelineErrorKind::Decode(_)
            | PipelineErrorKind::Task(_)
            | PipelineErrorKind::Transition(_) => ErrorCategory::Validation,
            PipelineErrorKind::Analysis(err) if err.is_format_error() => ErrorCategory::Format,
            PipelineErrorKind::Store(_)
            | PipelineErrorKind::Analysis(_)
            | PipelineErrorKind::Timeout(_) => ErrorCategory::Collaborator,
            PipelineErrorKind::Comment(_)
            | PipelineErrorKind::Result(_) => ErrorCategory::Format,
            PipelineErrorKind::Cancelled => ErrorCategory::Cancelled,
        }
    }
}
