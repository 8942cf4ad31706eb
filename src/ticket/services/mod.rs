//! Ticket task assembly services.

mod assembly;

pub use assembly::{MAX_EXTRA_FIELD_LEN, TicketTaskAssembler};
