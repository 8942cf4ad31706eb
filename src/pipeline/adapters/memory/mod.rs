//! In-memory pipeline adapters.

mod status_sink;
mod transport;

pub use status_sink::RecordingStatusSink;
pub use transport::InMemoryPeerTransport;
