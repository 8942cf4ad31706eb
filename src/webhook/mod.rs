//! Inbound ticket notifications.
//!
//! Normalizes vendor-shaped and flat webhook payloads into a canonical
//! [`domain::WebhookEvent`] and serves the HTTP endpoint that receives them.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Normalization services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
