//! Peer transport that keeps submitted tasks in memory.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::pipeline::{
    domain::TaskStatus,
    ports::{PeerTransport, TaskHandle, TransportError, TransportResult},
};
use crate::ticket::domain::TransportMessage;

/// Transport that accepts every task without processing it.
///
/// An [`InMemoryPeerTransport::unreachable`] instance refuses every call,
/// which stands in for a peer that is down.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPeerTransport {
    sent: Arc<RwLock<Vec<TransportMessage>>>,
    unreachable: bool,
}

impl InMemoryPeerTransport {
    /// Creates a reachable transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose peer never answers.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Returns every message accepted so far.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when the lock is poisoned.
    pub fn sent(&self) -> TransportResult<Vec<TransportMessage>> {
        let sent = self
            .sent
            .read()
            .map_err(|err| TransportError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(sent.clone())
    }
}

#[async_trait]
impl PeerTransport for InMemoryPeerTransport {
    async fn send_task(&self, message: TransportMessage) -> TransportResult<TaskHandle> {
        if self.unreachable {
            return Err(TransportError::Unreachable("no peer registered".to_owned()));
        }
        let mut sent = self
            .sent
            .write()
            .map_err(|err| TransportError::unavailable(std::io::Error::other(err.to_string())))?;
        sent.push(message);
        Ok(TaskHandle {
            task_id: Uuid::new_v4().to_string(),
            status: TaskStatus::Received,
            message: None,
        })
    }
}
