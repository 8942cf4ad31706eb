//! Adapter implementations for analysis ports.

pub mod memory;
