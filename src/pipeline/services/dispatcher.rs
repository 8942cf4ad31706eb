//! Producer-side hand-off of webhook events to the analyzing peer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::services::HeuristicAnalyzer;
use crate::comment::{domain::CommentError, services::CommentSynthesizer};
use crate::config::{PipelineConfig, SyntheticAnalysis};
use crate::pipeline::{
    domain::TaskStatus,
    ports::{PeerTransport, TransportError},
};
use crate::ticket::{
    codec::{EncodeError, TaskEncoder},
    domain::{TicketTask, TicketTaskError},
    ports::{TicketStore, TicketStoreError},
    services::TicketTaskAssembler,
};
use crate::webhook::{
    domain::WebhookEvent,
    ports::{DispatchError, DispatchReceipt, DispatchResult, WebhookDispatch},
};

/// Notice rendered at the top of every synthetic comment.
pub const SYNTHETIC_NOTICE: &str = "Synthetic analysis: the analysis service was unreachable, \
so this comment was produced by local heuristics.";

/// Failures while forwarding an event to the peer.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// The ticket could not be fetched.
    #[error("failed to fetch ticket: {0}")]
    Fetch(#[source] TicketStoreError),

    /// The assembled task is invalid.
    #[error(transparent)]
    Task(#[from] TicketTaskError),

    /// The task could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The peer could not take the task.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The peer accepted the task and reported failure.
    #[error("peer reported failure: {0}")]
    PeerFailed(String),

    /// The synthetic comment could not be rendered.
    #[error(transparent)]
    Comment(#[from] CommentError),

    /// The synthetic comment could not be posted.
    #[error("failed to post synthetic comment: {0}")]
    Post(#[source] TicketStoreError),

    /// A ticket store call exceeded its deadline.
    #[error("ticket store call exceeded {0:?}")]
    Timeout(Duration),
}

/// Fetches, assembles and encodes ticket tasks, then hands them to the peer.
///
/// When the peer cannot be reached the configured [`SyntheticAnalysis`]
/// mode decides whether the dispatch fails or a locally produced comment is
/// logged or posted instead.
pub struct TicketDispatcher<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<dyn TicketStore>,
    transport: Arc<dyn PeerTransport>,
    heuristic: HeuristicAnalyzer,
    synthesizer: CommentSynthesizer,
    clock: Arc<C>,
    config: PipelineConfig,
}

impl<C> TicketDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        transport: Arc<dyn PeerTransport>,
        clock: Arc<C>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            transport,
            heuristic: HeuristicAnalyzer,
            synthesizer: CommentSynthesizer,
            clock,
            config,
        }
    }

    /// Forwards one event to the peer.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError`] when the ticket cannot be fetched or
    /// assembled, the peer fails, or the synthetic fallback fails.
    pub async fn forward(&self, event: &WebhookEvent) -> Result<DispatchReceipt, DispatcherError> {
        let ticket = self
            .bounded(self.store.get_ticket(&event.ticket_id))
            .await?
            .map_err(DispatcherError::Fetch)?;
        let task = TicketTaskAssembler::from_webhook(event, Some(&ticket))?;
        let message = TaskEncoder::encode(&task)?;

        let limit = self.config.collaborator_timeout;
        let sent = tokio::time::timeout(limit, self.transport.send_task(message))
            .await
            .unwrap_or(Err(TransportError::Timeout(limit)));
        match sent {
            Ok(handle) if handle.status == TaskStatus::Failed => {
                let detail = handle
                    .message
                    .map(|reply| reply.text_content())
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| "no details".to_owned());
                Err(DispatcherError::PeerFailed(detail))
            }
            Ok(handle) => {
                info!(
                    ticket_id = task.ticket_id(),
                    peer_task_id = %handle.task_id,
                    status = %handle.status,
                    "task handed to peer"
                );
                Ok(DispatchReceipt::processed(task.ticket_id()))
            }
            Err(err) if err.is_unreachable() => self.synthesize(&task, err).await,
            Err(err) => Err(err.into()),
        }
    }

    async fn synthesize(
        &self,
        task: &TicketTask,
        cause: TransportError,
    ) -> Result<DispatchReceipt, DispatcherError> {
        let mode = self.config.synthetic;
        if mode == SyntheticAnalysis::Disabled {
            return Err(cause.into());
        }
        warn!(
            ticket_id = task.ticket_id(),
            error = %cause,
            mode = ?mode,
            "peer unreachable, producing synthetic analysis"
        );
        let analysis = self.heuristic.analyze(task);
        let layout = self
            .synthesizer
            .layout(&analysis.to_collected_fields())
            .with_notice(SYNTHETIC_NOTICE);
        let body = self.synthesizer.render(&layout, self.clock.utc())?;

        let id = task.ticket_id();
        match mode {
            SyntheticAnalysis::PostComment => {
                let comment = self
                    .bounded(self.store.post_comment(id, &body))
                    .await?
                    .map_err(DispatcherError::Post)?;
                info!(ticket_id = id, comment_url = %comment.url, "synthetic analysis posted");
                Ok(DispatchReceipt {
                    ticket_id: id.to_owned(),
                    message: format!("Peer unreachable; synthetic analysis posted for ticket {id}"),
                })
            }
            SyntheticAnalysis::LogOnly | SyntheticAnalysis::Disabled => {
                info!(ticket_id = id, comment = %body, "synthetic analysis rendered, not posted");
                Ok(DispatchReceipt {
                    ticket_id: id.to_owned(),
                    message: format!("Peer unreachable; synthetic analysis logged for ticket {id}"),
                })
            }
        }
    }

    async fn bounded<T>(&self, request: impl Future<Output = T> + Send) -> Result<T, DispatcherError> {
        let limit = self.config.collaborator_timeout;
        tokio::time::timeout(limit, request)
            .await
            .map_err(|_| DispatcherError::Timeout(limit))
    }
}

#[async_trait]
impl<C> WebhookDispatch for TicketDispatcher<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn dispatch(&self, event: WebhookEvent) -> DispatchResult<DispatchReceipt> {
        self.forward(&event)
            .await
            .map_err(|err| DispatchError::new(event.ticket_id.clone(), err))
    }
}
