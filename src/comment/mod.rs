//! Tracker comment synthesis.
//!
//! [`services::CommentSynthesizer`] arranges analysis fields into a
//! [`domain::CommentLayout`] and renders it with `minijinja`. It also renders
//! the shorter analysis digest reported back to the requesting peer.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
