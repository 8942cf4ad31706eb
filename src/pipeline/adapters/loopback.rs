//! Peer transport that runs tasks through an in-process orchestrator.

use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

use crate::pipeline::{
    ports::{PeerTransport, TaskHandle, TransportResult},
    services::{PipelineInput, TaskOrchestrator},
};
use crate::ticket::domain::TransportMessage;

/// Transport connecting a dispatcher to an orchestrator in the same process.
///
/// Each call runs the full pipeline and answers with the final status: the
/// encoded result on success or the failure text otherwise.
pub struct LoopbackPeerTransport<C>
where
    C: Clock + Send + Sync,
{
    orchestrator: Arc<TaskOrchestrator<C>>,
}

impl<C> LoopbackPeerTransport<C>
where
    C: Clock + Send + Sync,
{
    /// Wraps an orchestrator.
    #[must_use]
    pub const fn new(orchestrator: Arc<TaskOrchestrator<C>>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl<C> PeerTransport for LoopbackPeerTransport<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn send_task(&self, message: TransportMessage) -> TransportResult<TaskHandle> {
        let cancel = self.orchestrator.run_token();
        let outcome = self
            .orchestrator
            .run(PipelineInput::Message(message), &cancel)
            .await;
        let reply = match &outcome.result {
            Ok(info) => info.encode().unwrap_or_else(|err| {
                warn!(run_id = %outcome.run.id(), error = %err, "run result could not be encoded");
                TransportMessage::from_text(err.to_string())
            }),
            Err(err) => TransportMessage::from_text(err.to_string()),
        };
        Ok(TaskHandle {
            task_id: outcome.run.id().to_string(),
            status: outcome.run.status(),
            message: Some(reply),
        })
    }
}
