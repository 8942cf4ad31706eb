//! Domain model for comment synthesis.

mod error;
mod layout;

pub use error::CommentError;
pub use layout::{CommentEntry, CommentLayout, CommentSection};
