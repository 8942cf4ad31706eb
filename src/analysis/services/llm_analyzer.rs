//! LLM-backed analysis strategy.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::{extract::first_json_object, prompt::build_prompt};
use crate::analysis::{
    domain::{AnalysisError, AnalysisResult, LLM_CONFIDENCE, Level},
    ports::{CompletionRequest, LlmClient},
};
use crate::config::LlmSettings;
use crate::ticket::domain::TicketTask;

/// Analyzes tasks by prompting an LLM and parsing its JSON answer.
#[derive(Clone)]
pub struct LlmAnalyzer {
    client: Arc<dyn LlmClient>,
    settings: LlmSettings,
}

impl LlmAnalyzer {
    /// Creates an analyzer over a client.
    #[must_use]
    pub fn new(client: Arc<dyn LlmClient>, settings: LlmSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the request settings.
    #[must_use]
    pub const fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    /// Analyzes a task.
    ///
    /// The call is bounded by the configured timeout regardless of whether
    /// the client honours it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the call fails, times out, or the
    /// response holds no usable JSON object.
    pub async fn analyze(&self, task: &TicketTask) -> Result<AnalysisResult, AnalysisError> {
        let request = CompletionRequest {
            prompt: build_prompt(task),
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            timeout: self.settings.timeout,
        };
        debug!(
            ticket_id = task.ticket_id(),
            model = %request.model,
            prompt_len = request.prompt.len(),
            "requesting LLM analysis"
        );

        let response = tokio::time::timeout(self.settings.timeout, self.client.complete(request))
            .await
            .map_err(|_| AnalysisError::Timeout(self.settings.timeout))??;
        parse_response(&response)
    }
}

impl std::fmt::Debug for LlmAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAnalyzer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Parses a raw LLM response into an analysis.
///
/// Fields with an unexpected JSON type are treated as absent.
///
/// # Errors
///
/// Returns [`AnalysisError`] when no balanced JSON object can be isolated,
/// the span is not valid JSON, or it is not an object.
pub fn parse_response(response: &str) -> Result<AnalysisResult, AnalysisError> {
    let span = first_json_object(response).ok_or(AnalysisError::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(span).map_err(|err| AnalysisError::InvalidJson(err.to_string()))?;
    let Value::Object(object) = value else {
        return Err(AnalysisError::NotAnObject);
    };

    Ok(AnalysisResult {
        key_themes: string_list(&object, "keyThemes"),
        risk_level: level(&object, "riskLevel").unwrap_or_default(),
        priority: level(&object, "priority").unwrap_or_default(),
        suggestion: string(&object, "suggestion"),
        requirements: string_list(&object, "requirements"),
        technical_analysis: string(&object, "technicalAnalysis"),
        business_impact: string(&object, "businessImpact"),
        next_steps: string(&object, "nextSteps"),
        recommended_priority: level(&object, "recommendedPriority"),
        recommended_components: string_list(&object, "recommendedComponents"),
        recommended_labels: string_list(&object, "recommendedLabels"),
        confidence: LLM_CONFIDENCE,
        llm_used: true,
    })
}

fn string(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn level(object: &Map<String, Value>, key: &str) -> Option<Level> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|token| !token.trim().is_empty())
        .map(Level::normalize)
}
