//! Peer transport port: hands encoded tasks to the analyzing process.

use crate::pipeline::domain::TaskStatus;
use crate::ticket::domain::TransportMessage;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for peer transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Peer's acknowledgement of a submitted task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskHandle {
    /// Peer-assigned task identifier.
    pub task_id: String,
    /// Status the peer reported.
    pub status: TaskStatus,
    /// Message attached to that status.
    pub message: Option<TransportMessage>,
}

/// Connection to the analyzing peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Submits an encoded task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the peer cannot be reached or refuses
    /// the task.
    async fn send_task(&self, message: TransportMessage) -> TransportResult<TaskHandle>;
}

/// Errors returned by peer transports.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No peer answered.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// The peer refused the task.
    #[error("peer rejected task: {0}")]
    Rejected(String),

    /// The call exceeded its deadline.
    #[error("peer call exceeded {0:?}")]
    Timeout(Duration),

    /// Transport failure.
    #[error("peer transport unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps a transport error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Returns `true` when the peer never received the task.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(_) | Self::Timeout(_) | Self::Unavailable(_)
        )
    }
}
