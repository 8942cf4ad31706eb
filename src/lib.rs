//! Ticket Lens: automated information gathering for tracker tickets.
//!
//! A tracker notification or an encoded task message enters the pipeline,
//! the ticket is analyzed by an LLM or by local heuristics, and the findings
//! are posted back to the ticket as a formatted comment.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, HTTP, etc.)
//!
//! # Modules
//!
//! - [`webhook`]: Tracker notification normalization and the HTTP endpoint
//! - [`ticket`]: Ticket tasks, their wire codec and the ticket store port
//! - [`analysis`]: LLM-backed and heuristic ticket analysis
//! - [`comment`]: Comment and digest rendering
//! - [`pipeline`]: Run orchestration and peer dispatch
//! - [`config`]: Pipeline configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod analysis;
pub mod comment;
pub mod config;
mod json_text;
pub mod pipeline;
pub mod telemetry;
pub mod ticket;
pub mod webhook;
