//! Validation errors raised while normalizing webhook payloads.

use thiserror::Error;

/// Reasons a webhook body cannot be normalized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// The request body was empty.
    #[error("webhook body is empty")]
    EmptyBody,

    /// The request body is not valid JSON.
    #[error("webhook body is not valid JSON: {0}")]
    InvalidJson(String),

    /// The JSON document is not an object.
    #[error("webhook body must be a JSON object")]
    NotAnObject,

    /// Neither the vendor nor the flat shape carries a ticket identifier.
    #[error("webhook payload is missing a ticket identifier")]
    MissingTicketId,

    /// The payload carries no event type.
    #[error("webhook payload is missing an event type")]
    MissingEvent,
}
