//! Error types for comment synthesis.

use thiserror::Error;

/// Failure to render a comment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentError {
    /// The template engine rejected the template or its context.
    #[error("failed to render {template}: {reason}")]
    Render {
        /// Template that failed.
        template: &'static str,
        /// Engine message.
        reason: String,
    },
}
