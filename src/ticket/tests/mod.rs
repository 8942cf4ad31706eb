//! Unit tests for the ticket context.
