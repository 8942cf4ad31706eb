//! Shared fixtures for pipeline integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use ticket_lens::{
    analysis::{
        adapters::memory::ScriptedLlmClient,
        services::{AnalysisEngine, LlmAnalyzer},
    },
    config::{LlmSettings, PipelineConfig},
    pipeline::{adapters::memory::RecordingStatusSink, services::TaskOrchestrator},
    ticket::{adapters::memory::InMemoryTicketStore, domain::Ticket},
};

/// In-memory collaborators shared by a test.
pub struct Backends {
    pub store: InMemoryTicketStore,
    pub sink: RecordingStatusSink,
}

impl Backends {
    /// Builds an orchestrator over these backends.
    pub fn orchestrator(
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

/// Backends seeded with a handful of tickets.
#[fixture]
pub fn backends() -> Backends {
    let mut urgent = Ticket::new("OPS-9", "Database failover error");
    urgent.priority = "Blocker".to_owned();
    urgent.description = "Failover to the replica never completes.".to_owned();
    urgent.labels = vec!["database".to_owned()];

    Backends {
        store: InMemoryTicketStore::with_tickets([
            Ticket::new("PROJ-1", "Quarterly report export"),
            Ticket::new("PROJ-2", "Add CSV import"),
            urgent,
        ]),
        sink: RecordingStatusSink::new(),
    }
}

/// Engine whose LLM answers with the given responses in order.
pub fn scripted_engine(responses: &[&str]) -> (AnalysisEngine, ScriptedLlmClient) {
    let client = responses
        .iter()
        .fold(ScriptedLlmClient::new(), |script, response| {
            script.with_response(*response)
        });
    let engine = AnalysisEngine::new(Some(LlmAnalyzer::new(
        Arc::new(client.clone()),
        LlmSettings::default(),
    )));
    (engine, client)
}
