//! Adapter implementations for the ticket context.

pub mod memory;
