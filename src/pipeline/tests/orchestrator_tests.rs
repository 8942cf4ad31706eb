//! Tests for the task orchestrator state machine.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use tokio_util::sync::CancellationToken;

use crate::analysis::{
    adapters::memory::ScriptedLlmClient,
    domain::Level,
    ports::LlmError,
    services::{AnalysisEngine, LlmAnalyzer},
};
use crate::config::{AnalysisFallback, LlmSettings, PipelineConfig};
use crate::pipeline::{
    adapters::memory::RecordingStatusSink,
    domain::{ErrorCategory, InfoResult, PipelineStage, TaskStatus},
    ports::{MockTaskStatusSink, StatusSinkError},
    services::{ANALYSIS_ARTIFACT, COMMENT_ARTIFACT, PipelineInput, TaskOrchestrator},
};
use crate::ticket::{
    adapters::memory::InMemoryTicketStore,
    codec::TaskEncoder,
    domain::{CommentRef, Ticket, TicketTask, TransportMessage},
    ports::{MockTicketStore, TicketStoreError},
};
use crate::webhook::{
    domain::{EventKind, WebhookEvent},
    ports::WebhookDispatch,
};

struct Harness {
    store: InMemoryTicketStore,
    sink: RecordingStatusSink,
}

impl Harness {
    fn orchestrator(
        &self,
        engine: AnalysisEngine,
        config: PipelineConfig,
    ) -> TaskOrchestrator<DefaultClock> {
        TaskOrchestrator::new(
            Arc::new(self.store.clone()),
            Arc::new(self.sink.clone()),
            engine,
            Arc::new(DefaultClock),
            config,
        )
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        store: InMemoryTicketStore::with_tickets([
            Ticket::new("PROJ-1", "Quarterly report export"),
            Ticket::new("PROJ-2", "Fix crash on save"),
        ]),
        sink: RecordingStatusSink::new(),
    }
}

fn task_message(ticket_id: &str, summary: &str) -> TransportMessage {
    let task = TicketTask::new(ticket_id, summary).expect("valid task");
    TaskEncoder::encode(&task).expect("encode task")
}

fn llm_engine(client: ScriptedLlmClient, timeout: Duration) -> AnalysisEngine {
    let settings = LlmSettings {
        timeout,
        ..LlmSettings::default()
    };
    AnalysisEngine::new(Some(LlmAnalyzer::new(Arc::new(client), settings)))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_run_walks_every_stage(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(
        outcome.run.visited(),
        [
            TaskStatus::Received,
            TaskStatus::Processing,
            TaskStatus::Analyzing,
            TaskStatus::GeneratingSummary,
            TaskStatus::PostingComment,
            TaskStatus::Completed,
        ]
    );
    let run_id = outcome.run.id();
    let info = outcome.into_result().expect("run completes");
    assert_eq!(info.ticket_id, "PROJ-2");
    assert_eq!(info.analysis_result.key_themes, ["problem"]);
    assert!(!info.analysis_result.llm_used);

    let comments = harness.store.comments().expect("comments readable");
    let [comment] = comments.as_slice() else {
        panic!("expected one comment, got {comments:?}");
    };
    assert_eq!(comment.ticket_id, "PROJ-2");
    assert!(comment.body.contains("*Suggestion:*"));
    assert_eq!(info.comment_url.as_deref(), Some(comment.reference.url.as_str()));

    let states = harness.sink.states(run_id).expect("states readable");
    assert_eq!(states.first(), Some(&TaskStatus::Received));
    assert_eq!(states.last(), Some(&TaskStatus::Completed));
    let artifacts = harness.sink.artifacts(run_id).expect("artifacts readable");
    let names: Vec<&str> = artifacts.iter().map(|artifact| artifact.name.as_str()).collect();
    assert_eq!(names, [ANALYSIS_ARTIFACT, COMMENT_ARTIFACT]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_update_carries_encoded_result(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-1", "Quarterly report export")),
            &CancellationToken::new(),
        )
        .await;

    let updates = harness.sink.updates(outcome.run.id()).expect("updates readable");
    let completed = updates.last().expect("at least one update");
    assert_eq!(completed.state, TaskStatus::Completed);
    let message = completed.message.as_ref().expect("completion message");
    let decoded = InfoResult::decode(message).expect("decode result");
    assert_eq!(decoded, outcome.into_result().expect("run completes"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn webhook_run_fetches_ticket_details(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let event = WebhookEvent::new("PROJ-1", EventKind::Created, Utc::now());

    let outcome = orchestrator
        .run(PipelineInput::Webhook(event), &CancellationToken::new())
        .await;

    assert!(outcome.run.visited().contains(&TaskStatus::FetchingDetails));
    assert_eq!(outcome.run.ticket_id(), Some("PROJ-1"));
    let info = outcome.into_result().expect("run completes");
    assert_eq!(info.analysis_result.priority, Level::Medium);
    assert_eq!(info.analysis_result.risk_level, Level::Medium);
    assert_eq!(info.analysis_result.key_themes, ["task"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn webhook_for_unknown_ticket_fails_at_fetch(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let event = WebhookEvent::new("PROJ-404", EventKind::Updated, Utc::now());

    let outcome = orchestrator
        .run(PipelineInput::Webhook(event), &CancellationToken::new())
        .await;

    assert_eq!(outcome.run.status(), TaskStatus::Failed);
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.stage(), PipelineStage::FetchDetails);
    assert_eq!(err.category(), ErrorCategory::Collaborator);
    assert!(harness.store.comments().expect("comments readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_message_fails_validation(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());

    let outcome = orchestrator
        .run(
            PipelineInput::Message(TransportMessage::from_text("hello there")),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(
        outcome.run.visited(),
        [TaskStatus::Received, TaskStatus::Processing, TaskStatus::Failed]
    );
    let updates = harness.sink.updates(outcome.run.id()).expect("updates readable");
    let failure = updates
        .last()
        .and_then(|update| update.message_text())
        .expect("failure message");
    assert!(failure.starts_with("decode failed"), "got {failure}");
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detail_fetch_failure_is_tolerated_for_messages() {
    let mut store = MockTicketStore::new();
    store
        .expect_get_ticket()
        .returning(|id| Err(TicketStoreError::Rejected(format!("{id} is archived"))));
    store.expect_post_comment().times(1).returning(|_, _| {
        Ok(CommentRef {
            id: "7".to_owned(),
            url: "https://tracker/PROJ-3#7".to_owned(),
        })
    });
    let config = PipelineConfig {
        fetch_details: true,
        ..PipelineConfig::default()
    };
    let orchestrator = TaskOrchestrator::new(
        Arc::new(store),
        Arc::new(RecordingStatusSink::new()),
        AnalysisEngine::heuristic_only(),
        Arc::new(DefaultClock),
        config,
    );

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-3", "Add dark mode")),
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.run.visited().contains(&TaskStatus::FetchingDetails));
    let info = outcome.into_result().expect("run completes");
    assert_eq!(info.analysis_result.key_themes, ["new_functionality"]);
    assert_eq!(info.comment_url.as_deref(), Some("https://tracker/PROJ-3#7"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn llm_failure_falls_back_to_heuristics(harness: Harness) {
    let client = ScriptedLlmClient::new().with_failure(LlmError::Rejected("quota".to_owned()));
    let orchestrator =
        harness.orchestrator(llm_engine(client, Duration::from_secs(5)), PipelineConfig::default());

    let info = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &CancellationToken::new(),
        )
        .await
        .into_result()
        .expect("fallback completes the run");

    assert!(!info.analysis_result.llm_used);
    assert_eq!(info.analysis_result.key_themes, ["problem"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn llm_failure_fails_the_run_when_configured(harness: Harness) {
    let client = ScriptedLlmClient::replying("I could not decide.");
    let config = PipelineConfig {
        fallback: AnalysisFallback::FailFast,
        ..PipelineConfig::default()
    };
    let orchestrator = harness.orchestrator(llm_engine(client, Duration::from_secs(5)), config);

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome.run.status(), TaskStatus::Failed);
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.stage(), PipelineStage::Analyze);
    assert_eq!(err.category(), ErrorCategory::Format);
    assert!(harness.store.comments().expect("comments readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn llm_result_is_used_when_available(harness: Harness) {
    let client = ScriptedLlmClient::replying(r#"Here is the result: {"riskLevel":"Critical"} thanks"#);
    let orchestrator =
        harness.orchestrator(llm_engine(client, Duration::from_secs(5)), PipelineConfig::default());

    let info = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-1", "Quarterly report export")),
            &CancellationToken::new(),
        )
        .await
        .into_result()
        .expect("run completes");

    assert_eq!(info.analysis_result.risk_level, Level::High);
    assert!(info.analysis_result.llm_used);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_token_stops_before_decode(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &cancel,
        )
        .await;

    assert_eq!(outcome.run.visited(), [TaskStatus::Received, TaskStatus::Failed]);
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.category(), ErrorCategory::Cancelled);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancellation_interrupts_slow_analysis(harness: Harness) {
    let client = ScriptedLlmClient::replying("{}").with_delay(Duration::from_secs(30));
    let orchestrator =
        harness.orchestrator(llm_engine(client, Duration::from_secs(60)), PipelineConfig::default());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &cancel,
        )
        .await;
    canceller.await.expect("canceller finishes");

    assert_eq!(outcome.run.status(), TaskStatus::Failed);
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.stage(), PipelineStage::Analyze);
    assert_eq!(err.category(), ErrorCategory::Cancelled);
    assert!(harness.store.comments().expect("comments readable").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sink_failures_do_not_fail_the_run(harness: Harness) {
    let mut sink = MockTaskStatusSink::new();
    sink.expect_update_status()
        .returning(|_, _| Err(StatusSinkError::Rejected("sink offline".to_owned())));
    sink.expect_add_artifact()
        .returning(|_, _| Err(StatusSinkError::Rejected("sink offline".to_owned())));
    let orchestrator = TaskOrchestrator::new(
        Arc::new(harness.store.clone()),
        Arc::new(sink),
        AnalysisEngine::heuristic_only(),
        Arc::new(DefaultClock),
        PipelineConfig::default(),
    );

    let outcome = orchestrator
        .run(
            PipelineInput::Message(task_message("PROJ-2", "Fix crash on save")),
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome.run.status(), TaskStatus::Completed);
    assert_eq!(harness.store.comments().expect("comments readable").len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn webhook_dispatch_reports_processed_receipt(harness: Harness) {
    let orchestrator = harness.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let event = WebhookEvent::new("PROJ-1", EventKind::Created, Utc::now());

    let receipt = orchestrator.dispatch(event).await.expect("dispatch succeeds");

    assert_eq!(receipt.ticket_id, "PROJ-1");
    assert_eq!(receipt.message, "Successfully processed webhook for ticket PROJ-1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_token_cancels_dispatched_runs(harness: Harness) {
    let shutdown = CancellationToken::new();
    let orchestrator = harness
        .orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default())
        .with_shutdown(shutdown.clone());
    shutdown.cancel();

    let result = orchestrator
        .dispatch(WebhookEvent::new("PROJ-1", EventKind::Created, Utc::now()))
        .await;

    assert!(result.is_err());
    assert!(harness.store.comments().expect("comments readable").is_empty());
}
