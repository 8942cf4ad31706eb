//! Ticket analysis.
//!
//! [`services::AnalysisEngine`] turns a [`crate::ticket::domain::TicketTask`]
//! into a [`domain::AnalysisResult`]. It prompts an LLM through
//! [`ports::LlmClient`] when one is configured and falls back to keyword
//! heuristics otherwise. Risk and priority tokens from either source are
//! normalized onto the three-bucket [`domain::Level`] scale.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
