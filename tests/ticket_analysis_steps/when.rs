//! When steps for ticket analysis BDD scenarios.

use std::sync::Arc;

use super::world::{TicketAnalysisWorld, run_async};
use chrono::Utc;
use mockable::DefaultClock;
use rstest_bdd_macros::when;
use ticket_lens::{
    analysis::{ports::LlmClient, services::AnalysisEngine},
    config::{LlmSettings, PipelineConfig},
    pipeline::services::{PipelineInput, TaskOrchestrator},
    webhook::domain::{EventKind, WebhookEvent},
};
use tokio_util::sync::CancellationToken;

#[when(r#"a "{kind}" webhook arrives for "{key}""#)]
fn webhook_arrives(world: &mut TicketAnalysisWorld, kind: String, key: String) {
    let config = world
        .llm
        .as_ref()
        .map_or_else(PipelineConfig::default, |_| {
            PipelineConfig::with_llm(LlmSettings::default())
        });
    let client = world
        .llm
        .clone()
        .map(|llm| Arc::new(llm) as Arc<dyn LlmClient>);
    let orchestrator = TaskOrchestrator::new(
        Arc::new(world.store.clone()),
        Arc::new(world.sink.clone()),
        AnalysisEngine::from_config(client, &config),
        Arc::new(DefaultClock),
        config,
    );
    let event = WebhookEvent::new(key, EventKind::from(kind), Utc::now());

    let outcome = run_async(orchestrator.run(PipelineInput::Webhook(event), &CancellationToken::new()));
    world.outcome = Some(outcome);
}
