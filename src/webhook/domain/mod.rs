//! Domain model for inbound ticket notifications.

mod error;
mod event;

pub use error::WebhookError;
pub use event::{EventKind, WebhookEvent, project_key_of};
