//! Structured analysis output and its flat field view.

use super::Level;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence reported for LLM-backed analyses.
pub const LLM_CONFIDENCE: f64 = 0.9;
/// Confidence reported for heuristic analyses.
pub const HEURISTIC_CONFIDENCE: f64 = 0.5;

/// Analysis as a flat map from field name to display text.
pub type CollectedFields = BTreeMap<String, String>;

/// Flat field names, as used by comment rendering and legacy consumers.
pub mod field {
    /// Key theme tags.
    pub const KEY_THEMES: &str = "KeyThemes";
    /// Risk bucket.
    pub const RISK_LEVEL: &str = "RiskLevel";
    /// Priority bucket.
    pub const PRIORITY: &str = "Priority";
    /// Primary suggestion.
    pub const SUGGESTION: &str = "Suggestion";
    /// Requirements list.
    pub const REQUIREMENTS: &str = "Requirements";
    /// Technical analysis prose.
    pub const TECHNICAL_ANALYSIS: &str = "TechnicalAnalysis";
    /// Business impact prose.
    pub const BUSINESS_IMPACT: &str = "BusinessImpact";
    /// Next steps prose.
    pub const NEXT_STEPS: &str = "NextSteps";
    /// Recommended priority bucket.
    pub const RECOMMENDED_PRIORITY: &str = "RecommendedPriority";
    /// Recommended components.
    pub const RECOMMENDED_COMPONENTS: &str = "RecommendedComponents";
    /// Recommended labels.
    pub const RECOMMENDED_LABELS: &str = "RecommendedLabels";
    /// Confidence score.
    pub const CONFIDENCE: &str = "Confidence";
    /// Whether an LLM produced the analysis.
    pub const LLM_GENERATED: &str = "LLMGenerated";
}

/// Structured insight produced for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Theme tags.
    #[serde(default)]
    pub key_themes: Vec<String>,
    /// Risk bucket.
    #[serde(default)]
    pub risk_level: Level,
    /// Priority bucket.
    #[serde(default)]
    pub priority: Level,
    /// One-sentence primary suggestion.
    #[serde(default)]
    pub suggestion: String,
    /// Requirements inferred from the ticket.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Technical analysis prose.
    #[serde(default)]
    pub technical_analysis: String,
    /// Business impact prose.
    #[serde(default)]
    pub business_impact: String,
    /// Recommended next steps.
    #[serde(default)]
    pub next_steps: String,
    /// Priority the analysis recommends, when it states one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_priority: Option<Level>,
    /// Components the analysis recommends.
    #[serde(default)]
    pub recommended_components: Vec<String>,
    /// Labels the analysis recommends.
    #[serde(default)]
    pub recommended_labels: Vec<String>,
    /// Confidence in the range `0.0..=1.0`.
    #[serde(default)]
    pub confidence: f64,
    /// Whether an LLM produced the analysis.
    #[serde(default, rename = "llmUsed")]
    pub llm_used: bool,
}

impl AnalysisResult {
    /// Returns the flat field view, omitting empty values.
    #[must_use]
    pub fn to_collected_fields(&self) -> CollectedFields {
        let entries = [
            (field::KEY_THEMES, self.key_themes.join(", ")),
            (field::RISK_LEVEL, self.risk_level.to_string()),
            (field::PRIORITY, self.priority.to_string()),
            (field::SUGGESTION, self.suggestion.clone()),
            (field::REQUIREMENTS, self.requirements.join("; ")),
            (field::TECHNICAL_ANALYSIS, self.technical_analysis.clone()),
            (field::BUSINESS_IMPACT, self.business_impact.clone()),
            (field::NEXT_STEPS, self.next_steps.clone()),
            (
                field::RECOMMENDED_PRIORITY,
                self.recommended_priority
                    .map(String::from)
                    .unwrap_or_default(),
            ),
            (
                field::RECOMMENDED_COMPONENTS,
                self.recommended_components.join(", "),
            ),
            (field::RECOMMENDED_LABELS, self.recommended_labels.join(", ")),
            (field::CONFIDENCE, format!("{:.2}", self.confidence)),
            (field::LLM_GENERATED, self.llm_used.to_string()),
        ];
        entries
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }

    /// Rebuilds a structured result from a flat field map.
    ///
    /// Used only to read results written by older peers; unknown keys are
    /// ignored and missing ones take their defaults.
    #[must_use]
    pub fn from_collected_fields(fields: &CollectedFields) -> Self {
        let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
        let list = |key: &str, separator: char| {
            fields
                .get(key)
                .map(|joined| {
                    joined
                        .split(separator)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_owned)
                        .collect::<Vec<String>>()
                })
                .unwrap_or_default()
        };
        let requirements_separator = fields
            .get(field::REQUIREMENTS)
            .filter(|joined| joined.contains(';'))
            .map_or(',', |_| ';');

        Self {
            key_themes: list(field::KEY_THEMES, ','),
            risk_level: Level::normalize(&text(field::RISK_LEVEL)),
            priority: Level::normalize(&text(field::PRIORITY)),
            suggestion: text(field::SUGGESTION),
            requirements: list(field::REQUIREMENTS, requirements_separator),
            technical_analysis: text(field::TECHNICAL_ANALYSIS),
            business_impact: text(field::BUSINESS_IMPACT),
            next_steps: text(field::NEXT_STEPS),
            recommended_priority: fields
                .get(field::RECOMMENDED_PRIORITY)
                .filter(|value| !value.trim().is_empty())
                .map(|value| Level::normalize(value)),
            recommended_components: list(field::RECOMMENDED_COMPONENTS, ','),
            recommended_labels: list(field::RECOMMENDED_LABELS, ','),
            confidence: fields
                .get(field::CONFIDENCE)
                .and_then(|value| value.trim().parse::<f64>().ok())
                .unwrap_or_default(),
            llm_used: fields
                .get(field::LLM_GENERATED)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
        }
    }
}
