//! Runs triggered by encoded task messages.

use super::helpers::{Backends, backends, scripted_engine};
use rstest::rstest;
use ticket_lens::{
    analysis::{domain::Level, services::AnalysisEngine},
    config::PipelineConfig,
    pipeline::{
        domain::{InfoResult, TaskStatus},
        services::PipelineInput,
    },
    ticket::{
        codec::{TaskEncoder, WireShape},
        domain::TicketTask,
    },
};
use tokio_util::sync::CancellationToken;

#[rstest]
#[case(WireShape::Canonical)]
#[case(WireShape::Aliased)]
#[case(WireShape::StringEncoded)]
#[case(WireShape::LegacyNested)]
#[tokio::test(flavor = "multi_thread")]
async fn every_wire_shape_reaches_completion(backends: Backends, #[case] shape: WireShape) {
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let task = TicketTask::new("PROJ-2", "Add CSV import")
        .expect("valid task")
        .with_priority("Low");
    let message = TaskEncoder::encode_as(&task, shape).expect("encode task");

    let info = orchestrator
        .run(PipelineInput::Message(message), &CancellationToken::new())
        .await
        .into_result()
        .expect("run completes");

    assert_eq!(info.ticket_id, "PROJ-2");
    assert_eq!(info.analysis_result.key_themes, ["new_functionality"]);
    assert_eq!(info.analysis_result.priority, Level::Low);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn llm_analysis_shapes_comment_and_digest(backends: Backends) {
    let (engine, client) = scripted_engine(&[r#"```json
{"keyThemes":["reporting","export"],"riskLevel":"minor","priority":"Medium",
 "suggestion":"Confirm the export format with finance.",
 "requirements":["CSV and XLSX output","Quarter selector"],
 "technicalAnalysis":"Reuse the existing report query.",
 "recommendedLabels":["finance"]}
```"#]);
    let orchestrator = backends.orchestrator(engine, PipelineConfig::default());
    let task = TicketTask::new("PROJ-1", "Quarterly report export")
        .expect("valid task")
        .with_description("Finance needs the quarterly numbers as a spreadsheet.");
    let message = TaskEncoder::encode(&task).expect("encode task");

    let outcome = orchestrator
        .run(PipelineInput::Message(message), &CancellationToken::new())
        .await;

    let run_id = outcome.run.id();
    let info = outcome.into_result().expect("run completes");
    assert!(info.analysis_result.llm_used);
    assert_eq!(info.analysis_result.risk_level, Level::Low);
    assert!(info.summary.contains("Confirm the export format with finance."));

    let comments = backends.store.comments().expect("comments readable");
    let [comment] = comments.as_slice() else {
        panic!("expected one comment, got {comments:?}");
    };
    assert!(comment.body.contains("Reuse the existing report query."));
    assert!(comment.body.contains("finance"));

    let requests = client.requests().expect("requests readable");
    let [request] = requests.as_slice() else {
        panic!("expected one request, got {requests:?}");
    };
    assert!(request.prompt.contains("Item ID: PROJ-1"));
    assert!(request.prompt.contains("Description: Finance needs the quarterly numbers"));

    let states = backends.sink.states(run_id).expect("states readable");
    assert_eq!(states.last(), Some(&TaskStatus::Completed));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_message_round_trips_through_the_sink(backends: Backends) {
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let task = TicketTask::new("OPS-9", "Database failover error").expect("valid task");
    let message = TaskEncoder::encode(&task).expect("encode task");

    let outcome = orchestrator
        .run(PipelineInput::Message(message), &CancellationToken::new())
        .await;

    let updates = backends.sink.updates(outcome.run.id()).expect("updates readable");
    let reported = updates
        .iter()
        .rev()
        .find_map(|update| update.message.as_ref())
        .map(InfoResult::decode)
        .expect("completion carries a message")
        .expect("completion message decodes");
    assert_eq!(reported, outcome.into_result().expect("run completes"));
}
