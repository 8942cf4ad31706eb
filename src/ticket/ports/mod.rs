//! Port contracts for the ticket tracker.

mod store;

pub use store::{TicketStore, TicketStoreError, TicketStoreResult};

#[cfg(test)]
pub use store::MockTicketStore;
