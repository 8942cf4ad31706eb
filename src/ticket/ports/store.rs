//! Ticket store port: fetch ticket details and post comments.

use crate::ticket::domain::{CommentRef, Ticket};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ticket store operations.
pub type TicketStoreResult<T> = Result<T, TicketStoreError>;

/// Ticket tracker contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Fetches the current snapshot of a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketStoreError::NotFound`] when the ticket does not exist.
    async fn get_ticket(&self, ticket_id: &str) -> TicketStoreResult<Ticket>;

    /// Posts a comment on a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketStoreError::NotFound`] when the ticket does not exist.
    async fn post_comment(&self, ticket_id: &str, body: &str) -> TicketStoreResult<CommentRef>;
}

/// Errors returned by ticket store implementations.
#[derive(Debug, Clone, Error)]
pub enum TicketStoreError {
    /// The ticket does not exist.
    #[error("ticket not found: {0}")]
    NotFound(String),

    /// The tracker rejected the request.
    #[error("ticket store rejected request: {0}")]
    Rejected(String),

    /// Transport or backend failure.
    #[error("ticket store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TicketStoreError {
    /// Wraps a backend error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
