//! Strategy selection for ticket analysis.

use std::sync::Arc;

use tracing::{debug, info};

use super::{HeuristicAnalyzer, LlmAnalyzer};
use crate::analysis::{
    domain::{AnalysisError, AnalysisResult},
    ports::LlmClient,
};
use crate::config::PipelineConfig;
use crate::ticket::domain::TicketTask;

/// Produces an [`AnalysisResult`] for a task.
///
/// With an LLM analyzer configured every call goes to the LLM and failures
/// are returned to the caller; fallback to heuristics is the caller's
/// decision. Without one, the heuristic analyzer answers directly.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    llm: Option<LlmAnalyzer>,
    heuristic: HeuristicAnalyzer,
}

impl AnalysisEngine {
    /// Creates an engine, optionally backed by an LLM.
    #[must_use]
    pub const fn new(llm: Option<LlmAnalyzer>) -> Self {
        Self {
            llm,
            heuristic: HeuristicAnalyzer,
        }
    }

    /// Creates an engine that never calls an LLM.
    #[must_use]
    pub const fn heuristic_only() -> Self {
        Self::new(None)
    }

    /// Creates an engine from configuration.
    ///
    /// An LLM analyzer is built only when both a client and LLM settings are
    /// present.
    #[must_use]
    pub fn from_config(client: Option<Arc<dyn LlmClient>>, config: &PipelineConfig) -> Self {
        let llm = client
            .zip(config.llm.clone())
            .map(|(llm_client, settings)| LlmAnalyzer::new(llm_client, settings));
        Self::new(llm)
    }

    /// Returns `true` when analyses go through an LLM.
    #[must_use]
    pub const fn uses_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Analyzes a task with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the LLM strategy fails. The heuristic
    /// strategy never fails.
    pub async fn analyze(&self, task: &TicketTask) -> Result<AnalysisResult, AnalysisError> {
        let Some(llm) = &self.llm else {
            debug!(ticket_id = task.ticket_id(), "no LLM configured, using heuristics");
            return Ok(self.analyze_heuristic(task));
        };
        let result = llm.analyze(task).await?;
        info!(
            ticket_id = task.ticket_id(),
            risk = %result.risk_level,
            priority = %result.priority,
            "LLM analysis complete"
        );
        Ok(result)
    }

    /// Analyzes a task with keyword heuristics.
    #[must_use]
    pub fn analyze_heuristic(&self, task: &TicketTask) -> AnalysisResult {
        self.heuristic.analyze(task)
    }
}
