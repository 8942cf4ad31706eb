//! Runs triggered by tracker notifications.

use super::helpers::{Backends, backends};
use chrono::Utc;
use rstest::rstest;
use ticket_lens::{
    analysis::{domain::Level, services::AnalysisEngine},
    config::{AnalysisFallback, PipelineConfig},
    pipeline::{
        domain::{ErrorCategory, PipelineStage, TaskStatus},
        services::PipelineInput,
    },
    webhook::domain::{EventKind, WebhookEvent},
};
use tokio_util::sync::CancellationToken;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ticket_priority_drives_heuristic_risk(backends: Backends) {
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let event = WebhookEvent::new("OPS-9", EventKind::Updated, Utc::now());

    let outcome = orchestrator
        .run(PipelineInput::Webhook(event), &CancellationToken::new())
        .await;

    assert_eq!(
        outcome.run.visited(),
        [
            TaskStatus::Received,
            TaskStatus::Processing,
            TaskStatus::FetchingDetails,
            TaskStatus::Analyzing,
            TaskStatus::GeneratingSummary,
            TaskStatus::PostingComment,
            TaskStatus::Completed,
        ]
    );
    let info = outcome.into_result().expect("run completes");
    assert_eq!(info.analysis_result.risk_level, Level::High);
    assert_eq!(info.analysis_result.priority, Level::High);
    assert_eq!(info.analysis_result.key_themes, ["problem"]);
    assert_eq!(info.analysis_result.recommended_priority, Some(Level::High));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn webhook_changes_feed_the_task(backends: Backends) {
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let mut event = WebhookEvent::new("PROJ-2", EventKind::Updated, Utc::now());
    event.changes.insert("urgency".to_owned(), "Critical".to_owned());

    let info = orchestrator
        .run(PipelineInput::Webhook(event), &CancellationToken::new())
        .await
        .into_result()
        .expect("run completes");

    assert_eq!(info.ticket_id, "PROJ-2");
    assert_eq!(info.analysis_result.key_themes, ["new_functionality"]);
    assert_eq!(info.analysis_result.priority, Level::High);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_ticket_fails_without_comment(backends: Backends) {
    let config = PipelineConfig {
        fallback: AnalysisFallback::FailFast,
        ..PipelineConfig::default()
    };
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), config);
    let event = WebhookEvent::new("GONE-1", EventKind::Created, Utc::now());

    let outcome = orchestrator
        .run(PipelineInput::Webhook(event), &CancellationToken::new())
        .await;

    assert_eq!(outcome.run.status(), TaskStatus::Failed);
    assert_eq!(outcome.run.ticket_id(), Some("GONE-1"));
    let err = outcome.into_result().expect_err("run must fail");
    assert_eq!(err.stage(), PipelineStage::FetchDetails);
    assert_eq!(err.category(), ErrorCategory::Collaborator);
    assert!(backends.store.comments().expect("comments readable").is_empty());
}
