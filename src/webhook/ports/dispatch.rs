//! Dispatch port invoked by the webhook endpoint.

use crate::webhook::domain::WebhookEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for webhook dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Outcome reported back to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Ticket the event referred to.
    pub ticket_id: String,
    /// Human-readable outcome.
    pub message: String,
}

impl DispatchReceipt {
    /// Creates the standard success receipt for a ticket.
    #[must_use]
    pub fn processed(ticket_id: impl Into<String>) -> Self {
        let id = ticket_id.into();
        Self {
            message: format!("Successfully processed webhook for ticket {id}"),
            ticket_id: id,
        }
    }
}

/// Consumer of normalized webhook events.
#[async_trait]
pub trait WebhookDispatch: Send + Sync {
    /// Processes one event to completion.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the event could not be processed.
    async fn dispatch(&self, event: WebhookEvent) -> DispatchResult<DispatchReceipt>;
}

/// Failure raised while dispatching an event.
#[derive(Debug, Clone, Error)]
#[error("failed to process webhook for ticket {ticket_id}: {cause}")]
pub struct DispatchError {
    ticket_id: String,
    cause: Arc<dyn std::error::Error + Send + Sync>,
}

impl DispatchError {
    /// Wraps the underlying processing error.
    pub fn new(
        ticket_id: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            cause: Arc::new(err),
        }
    }

    /// Returns the ticket the failed event referred to.
    #[must_use]
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }
}
