//! Step definitions for ticket analysis scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
