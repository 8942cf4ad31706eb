//! Run orchestration.
//!
//! [`services::TaskOrchestrator`] takes a ticket from trigger to posted
//! comment, tracking progress in a [`domain::PipelineRun`] whose status
//! follows the [`domain::TaskStatus`] state machine. On the producer side,
//! [`services::TicketDispatcher`] hands webhook events to the analyzing peer
//! through a [`ports::PeerTransport`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
