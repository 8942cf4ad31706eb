//! Unit tests for the webhook context.
