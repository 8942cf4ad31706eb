//! Port contracts for run reporting and peer hand-off.

mod status_sink;
mod transport;

pub use status_sink::{StatusSinkError, StatusSinkResult, TaskStatusSink};
pub use transport::{PeerTransport, TaskHandle, TransportError, TransportResult};

#[cfg(test)]
pub use status_sink::MockTaskStatusSink;
#[cfg(test)]
pub use transport::MockPeerTransport;
