//! Errors raised by the ticket task codec.

use thiserror::Error;

/// Failure to decode a ticket task from a transport message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The message carried no parts at all.
    #[error("message has no parts to decode")]
    NoParts,

    /// Every strategy declined every part.
    #[error("no ticket task with identifier and summary found after examining {examined}")]
    Exhausted {
        /// Description of the parts that were examined.
        examined: String,
    },
}

/// Failure to encode a ticket task.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// JSON serialization failed.
    #[error("failed to serialize ticket task: {0}")]
    Serialize(#[from] serde_json::Error),
}
