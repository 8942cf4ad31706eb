//! Status sink port: where run progress is reported.

use crate::pipeline::domain::{Artifact, RunId, StatusUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status sink operations.
pub type StatusSinkResult<T> = Result<T, StatusSinkError>;

/// Receiver of run status updates and artifacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStatusSink: Send + Sync {
    /// Records a status update for a run.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSinkError`] when the update cannot be delivered.
    async fn update_status(&self, run_id: RunId, update: StatusUpdate) -> StatusSinkResult<()>;

    /// Attaches an artifact to a run.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSinkError`] when the artifact cannot be delivered.
    async fn add_artifact(&self, run_id: RunId, artifact: Artifact) -> StatusSinkResult<()>;
}

/// Errors returned by status sinks.
#[derive(Debug, Clone, Error)]
pub enum StatusSinkError {
    /// The receiver refused the record.
    #[error("status sink rejected record: {0}")]
    Rejected(String),

    /// Transport or backend failure.
    #[error("status sink unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusSinkError {
    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
