//! Unit tests for comment synthesis.

mod digest_tests;
