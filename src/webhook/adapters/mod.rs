//! Adapters exposing the webhook context over HTTP.

pub mod http;
