//! Error types for ticket domain validation.

use thiserror::Error;

/// Errors returned while constructing a [`super::TicketTask`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketTaskError {
    /// The ticket identifier is empty after trimming.
    #[error("ticket task requires a non-empty ticket identifier")]
    EmptyTicketId,

    /// The summary is empty after trimming.
    #[error("ticket task {ticket_id} requires a non-empty summary")]
    EmptySummary {
        /// Identifier of the incomplete ticket.
        ticket_id: String,
    },
}
