//! Ticket tasks and their transport across the process boundary.
//!
//! A [`domain::TicketTask`] is the validated unit of work handed to analysis.
//! The [`codec`] module moves it between processes and tolerates the wire
//! shapes older producers emitted; [`services`] assembles tasks from webhook
//! events and tracker snapshots; [`ports`] describes the tracker itself.

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
