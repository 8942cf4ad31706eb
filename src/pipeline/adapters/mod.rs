//! Adapter implementations for pipeline ports.

pub mod loopback;
pub mod memory;
pub mod tracing_sink;

pub use loopback::LoopbackPeerTransport;
pub use tracing_sink::TracingStatusSink;
