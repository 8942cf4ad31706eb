//! Unit tests for the analysis context.

mod level_tests;
