//! End-to-end pipeline tests over the in-memory adapters.
//!
//! Tests are organized into modules by entry point:
//! - `message_tests`: Runs triggered by encoded task messages
//! - `webhook_tests`: Runs triggered by tracker notifications
//! - `dispatch_tests`: Producer-side hand-off to the analyzing peer

mod pipeline_it {
    pub mod helpers;

    mod dispatch_tests;
    mod message_tests;
    mod webhook_tests;
}
