//! Ticket analysis state machine.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::analysis::{domain::AnalysisResult, services::AnalysisEngine};
use crate::comment::{domain::CommentError, services::CommentSynthesizer};
use crate::config::{AnalysisFallback, PipelineConfig};
use crate::pipeline::{
    domain::{
        Artifact, ErrorCategory, InfoResult, PipelineError, PipelineErrorKind, PipelineRun,
        PipelineStage, RunId, StatusUpdate, TaskStatus,
    },
    ports::TaskStatusSink,
};
use crate::ticket::{
    codec::TaskDecoder,
    domain::{TicketTask, TransportMessage},
    ports::TicketStore,
    services::TicketTaskAssembler,
};
use crate::webhook::{
    domain::WebhookEvent,
    ports::{DispatchError, DispatchReceipt, DispatchResult, WebhookDispatch},
};

/// Name of the artifact carrying the analysis digest.
pub const ANALYSIS_ARTIFACT: &str = "analysis";
/// Name of the artifact carrying the posted comment reference.
pub const COMMENT_ARTIFACT: &str = "comment";

/// What triggered a run.
#[derive(Debug, Clone)]
pub enum PipelineInput {
    /// An encoded task from the peer process.
    Message(TransportMessage),
    /// A normalized tracker notification.
    Webhook(WebhookEvent),
}

/// A finished run and its result.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The run with its full status history.
    pub run: PipelineRun,
    /// The reported result, or the error that failed the run.
    pub result: Result<InfoResult, PipelineError>,
}

impl PipelineOutcome {
    /// Discards the run and returns the result.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] that failed the run.
    pub fn into_result(self) -> Result<InfoResult, PipelineError> {
        self.result
    }
}

/// Drives one ticket through decode, analysis, comment and result stages.
///
/// Every status change goes through [`PipelineRun::transition_to`] and is
/// then reported to the [`TaskStatusSink`]. Sink and artifact delivery is
/// best-effort: failures are logged and the run continues.
pub struct TaskOrchestrator<C>
where
    C: Clock + Send + Sync,
{
    store: Arc<dyn TicketStore>,
    sink: Arc<dyn TaskStatusSink>,
    engine: AnalysisEngine,
    decoder: Arc<TaskDecoder>,
    synthesizer: CommentSynthesizer,
    clock: Arc<C>,
    config: PipelineConfig,
    shutdown: CancellationToken,
}

impl<C> TaskOrchestrator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        sink: Arc<dyn TaskStatusSink>,
        engine: AnalysisEngine,
        clock: Arc<C>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            sink,
            engine,
            decoder: Arc::new(TaskDecoder::new()),
            synthesizer: CommentSynthesizer,
            clock,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Replaces the task decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: TaskDecoder) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Ties runs started through [`WebhookDispatch`] to a shutdown token.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns a token cancelled when the orchestrator shuts down.
    #[must_use]
    pub fn run_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Runs the pipeline for one input.
    ///
    /// The returned run ends in [`TaskStatus::Completed`] when the result is
    /// `Ok`, and in [`TaskStatus::Failed`] otherwise. Cancelling `cancel`
    /// drops the in-flight collaborator call and fails the run.
    pub async fn run(&self, input: PipelineInput, cancel: &CancellationToken) -> PipelineOutcome {
        let mut run = PipelineRun::new(&*self.clock);
        let span = info_span!("pipeline_run", run_id = %run.id());
        let result = self.drive(&mut run, input, cancel).instrument(span).await;
        PipelineOutcome { run, result }
    }

    async fn drive(
        &self,
        run: &mut PipelineRun,
        input: PipelineInput,
        cancel: &CancellationToken,
    ) -> Result<InfoResult, PipelineError> {
        self.publish(run.id(), StatusUpdate::new(run.status(), run.created_at()))
            .await;
        let result = self.execute(run, input, cancel).await;
        if let Err(err) = &result {
            self.fail(run, err).await;
        }
        result
    }

    async fn execute(
        &self,
        run: &mut PipelineRun,
        input: PipelineInput,
        cancel: &CancellationToken,
    ) -> Result<InfoResult, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::new(
                PipelineStage::Decode,
                PipelineErrorKind::Cancelled,
            ));
        }
        self.advance(run, TaskStatus::Processing, "Processing task...", PipelineStage::Decode)
            .await?;
        let task = match input {
            PipelineInput::Webhook(event) => self.task_from_webhook(run, &event, cancel).await?,
            PipelineInput::Message(message) => {
                self.task_from_message(run, &message, cancel).await?
            }
        };
        run.assign_ticket(task.ticket_id());
        info!(ticket_id = task.ticket_id(), "task accepted");

        self.advance(
            run,
            TaskStatus::Analyzing,
            &format!("Analyzing ticket {}: {}...", task.ticket_id(), task.summary()),
            PipelineStage::Analyze,
        )
        .await?;
        let analysis = self.analyze(&task, cancel).await?;

        self.advance(
            run,
            TaskStatus::GeneratingSummary,
            "Generating summary...",
            PipelineStage::Synthesize,
        )
        .await?;
        let synthesize = |err: CommentError| PipelineError::new(PipelineStage::Synthesize, err);
        let summary = self
            .synthesizer
            .digest(&task, &analysis)
            .map_err(synthesize)?;
        let body = self
            .synthesizer
            .format_analysis(&analysis, self.clock.utc())
            .map_err(synthesize)?;
        self.attach(
            run.id(),
            Artifact::text(ANALYSIS_ARTIFACT, "Ticket Analysis", summary.clone())
                .with_metadata_entry("ticketId", task.ticket_id()),
        )
        .await;

        self.advance(
            run,
            TaskStatus::PostingComment,
            &format!("Posting comment to ticket {}...", task.ticket_id()),
            PipelineStage::PostComment,
        )
        .await?;
        let comment = self
            .call(
                PipelineStage::PostComment,
                cancel,
                self.store.post_comment(task.ticket_id(), &body),
            )
            .await?;
        self.attach(
            run.id(),
            Artifact::text(COMMENT_ARTIFACT, "Posted Comment", comment.url.clone())
                .with_metadata_entry("ticketId", task.ticket_id())
                .with_metadata_entry("commentId", comment.id.clone()),
        )
        .await;

        let info = InfoResult {
            ticket_id: task.ticket_id().to_owned(),
            analysis_result: analysis,
            summary,
            comment_url: Some(comment.url),
        };
        let message = info
            .encode()
            .map_err(|err| PipelineError::new(PipelineStage::EncodeResult, err))?;
        self.transition(run, TaskStatus::Completed, Some(message), PipelineStage::EncodeResult)
            .await?;
        info!(ticket_id = %info.ticket_id, "run completed");
        Ok(info)
    }

    async fn task_from_webhook(
        &self,
        run: &mut PipelineRun,
        event: &WebhookEvent,
        cancel: &CancellationToken,
    ) -> Result<TicketTask, PipelineError> {
        run.assign_ticket(event.ticket_id.clone());
        self.advance(
            run,
            TaskStatus::FetchingDetails,
            &format!("Fetching details for ticket {}...", event.ticket_id),
            PipelineStage::FetchDetails,
        )
        .await?;
        let ticket = self
            .call(
                PipelineStage::FetchDetails,
                cancel,
                self.store.get_ticket(&event.ticket_id),
            )
            .await?;
        TicketTaskAssembler::from_webhook(event, Some(&ticket))
            .map_err(|err| PipelineError::new(PipelineStage::Decode, err))
    }

    async fn task_from_message(
        &self,
        run: &mut PipelineRun,
        message: &TransportMessage,
        cancel: &CancellationToken,
    ) -> Result<TicketTask, PipelineError> {
        let task = self
            .decoder
            .decode(message)
            .map_err(|err| PipelineError::new(PipelineStage::Decode, err))?;
        if !self.config.fetch_details {
            return Ok(task);
        }

        run.assign_ticket(task.ticket_id());
        self.advance(
            run,
            TaskStatus::FetchingDetails,
            &format!("Fetching details for ticket {}...", task.ticket_id()),
            PipelineStage::FetchDetails,
        )
        .await?;
        match self
            .call(
                PipelineStage::FetchDetails,
                cancel,
                self.store.get_ticket(task.ticket_id()),
            )
            .await
        {
            Ok(ticket) => Ok(TicketTaskAssembler::enrich(task, &ticket)),
            Err(err) if err.category() == ErrorCategory::Cancelled => Err(err),
            Err(err) => {
                warn!(
                    ticket_id = task.ticket_id(),
                    error = %err,
                    "ticket details unavailable, continuing with decoded task"
                );
                Ok(task)
            }
        }
    }

    async fn analyze(
        &self,
        task: &TicketTask,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, PipelineError> {
        let attempt = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(PipelineError::new(PipelineStage::Analyze, PipelineErrorKind::Cancelled));
            }
            result = self.engine.analyze(task) => result,
        };
        match (attempt, self.config.fallback) {
            (Ok(analysis), _) => Ok(analysis),
            (Err(err), AnalysisFallback::Heuristic) => {
                warn!(
                    ticket_id = task.ticket_id(),
                    error = %err,
                    "analysis failed, falling back to heuristics"
                );
                Ok(self.engine.analyze_heuristic(task))
            }
            (Err(err), AnalysisFallback::FailFast) => {
                Err(PipelineError::new(PipelineStage::Analyze, err))
            }
        }
    }

    /// Runs a collaborator call under the configured timeout and `cancel`.
    async fn call<T, E>(
        &self,
        stage: PipelineStage,
        cancel: &CancellationToken,
        request: impl Future<Output = Result<T, E>> + Send,
    ) -> Result<T, PipelineError>
    where
        E: Into<PipelineErrorKind>,
    {
        let limit = self.config.collaborator_timeout;
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PipelineError::new(stage, PipelineErrorKind::Cancelled)),
            outcome = tokio::time::timeout(limit, request) => match outcome {
                Ok(result) => result.map_err(|err| PipelineError::new(stage, err)),
                Err(_) => Err(PipelineError::new(stage, PipelineErrorKind::Timeout(limit))),
            },
        }
    }

    async fn advance(
        &self,
        run: &mut PipelineRun,
        next: TaskStatus,
        message: &str,
        stage: PipelineStage,
    ) -> Result<(), PipelineError> {
        self.transition(run, next, Some(TransportMessage::from_text(message)), stage)
            .await
    }

    async fn transition(
        &self,
        run: &mut PipelineRun,
        next: TaskStatus,
        message: Option<TransportMessage>,
        stage: PipelineStage,
    ) -> Result<(), PipelineError> {
        run.transition_to(next, &*self.clock)
            .map_err(|err| PipelineError::new(stage, err))?;
        let mut update = StatusUpdate::new(next, run.updated_at());
        update.message = message;
        self.publish(run.id(), update).await;
        Ok(())
    }

    async fn fail(&self, run: &mut PipelineRun, err: &PipelineError) {
        warn!(
            ticket_id = run.ticket_id().unwrap_or_default(),
            stage = %err.stage(),
            category = %err.category(),
            error = %err,
            "run failed"
        );
        let message = Some(TransportMessage::from_text(err.to_string()));
        if let Err(refused) = self
            .transition(run, TaskStatus::Failed, message, err.stage())
            .await
        {
            warn!(error = %refused, "run could not be marked failed");
        }
    }

    async fn publish(&self, run_id: RunId, update: StatusUpdate) {
        let state = update.state;
        if let Err(err) = self.sink.update_status(run_id, update).await {
            warn!(run_id = %run_id, state = %state, error = %err, "status update not delivered");
        }
    }

    async fn attach(&self, run_id: RunId, artifact: Artifact) {
        let name = artifact.name.clone();
        if let Err(err) = self.sink.add_artifact(run_id, artifact).await {
            warn!(run_id = %run_id, artifact = %name, error = %err, "artifact not delivered");
        }
    }
}

#[async_trait]
impl<C> WebhookDispatch for TaskOrchestrator<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn dispatch(&self, event: WebhookEvent) -> DispatchResult<DispatchReceipt> {
        let ticket_id = event.ticket_id.clone();
        let cancel = self.run_token();
        match self
            .run(PipelineInput::Webhook(event), &cancel)
            .await
            .into_result()
        {
            Ok(_) => Ok(DispatchReceipt::processed(ticket_id)),
            Err(err) => Err(DispatchError::new(ticket_id, err)),
        }
    }
}
