//! In-memory ticket store for tests and single-process hosts.

mod store;

pub use store::{InMemoryTicketStore, PostedComment};
