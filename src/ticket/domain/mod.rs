//! Domain model for ticket tasks and their transport envelope.

mod error;
mod message;
mod task;
mod ticket;

pub use error::TicketTaskError;
pub use message::{DataPart, MessagePart, TextPart, TransportMessage};
pub use task::{TicketTask, TicketTaskWire};
pub use ticket::{CommentRef, Ticket};
