//! Shared world state for ticket analysis BDD scenarios.

use ticket_lens::{
    analysis::adapters::memory::ScriptedLlmClient,
    pipeline::{adapters::memory::RecordingStatusSink, services::PipelineOutcome},
    ticket::adapters::memory::InMemoryTicketStore,
};
use rstest::fixture;

/// Scenario world for ticket analysis behaviour tests.
pub struct TicketAnalysisWorld {
    pub store: InMemoryTicketStore,
    pub sink: RecordingStatusSink,
    pub llm: Option<ScriptedLlmClient>,
    pub outcome: Option<PipelineOutcome>,
}

impl TicketAnalysisWorld {
    /// Creates a world with an empty store and no LLM.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: InMemoryTicketStore::new(),
            sink: RecordingStatusSink::new(),
            llm: None,
            outcome: None,
        }
    }

    /// Returns the finished run.
    pub fn outcome(&self) -> Result<&PipelineOutcome, eyre::Report> {
        self.outcome
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no run has been executed in this scenario"))
    }
}

impl Default for TicketAnalysisWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TicketAnalysisWorld {
    TicketAnalysisWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
