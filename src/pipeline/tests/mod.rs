//! Unit tests for the pipeline context.

mod orchestrator_tests;
