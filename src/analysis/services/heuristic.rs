//! Keyword heuristics used when no LLM is available.

use std::collections::BTreeSet;

use crate::analysis::domain::{AnalysisResult, HEURISTIC_CONFIDENCE, Level};
use crate::ticket::domain::TicketTask;

/// Theme emitted when no keyword matches.
pub const DEFAULT_THEME: &str = "task";

/// Theme tags and the summary keywords that select them, in emission order.
const THEMES: &[(&str, &[&str])] = &[
    ("problem", &["bug", "fix", "issue", "error", "problem"]),
    ("new_functionality", &["feature", "add", "new", "create"]),
    ("improvement", &["improve", "enhance", "update", "upgrade"]),
    ("documentation", &["document", "doc", "guide", "manual"]),
    ("research", &["research", "investigate", "analyze", "explore"]),
];

const PRIORITY_KEY_HINTS: &[&str] = &["priority", "importance", "urgency"];

const TECHNICAL_PLACEHOLDER: &str = "No detailed technical analysis available without LLM.";
const BUSINESS_PLACEHOLDER: &str =
    "Impact on operations cannot be determined without further analysis.";
const NEXT_STEPS_PLACEHOLDER: &str =
    "Review this item with the team to determine appropriate action.";
const REQUIREMENT_PLACEHOLDERS: &[&str] = &[
    "Gather more detailed information about the scope",
    "Assess impact on existing systems",
    "Consider testing and validation requirements",
];

/// Deterministic keyword-based analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    /// Analyzes a task from its summary, priority and metadata.
    #[must_use]
    pub fn analyze(self, task: &TicketTask) -> AnalysisResult {
        let key_themes = themes(task.summary());
        let priority = Level::normalize(&priority_token(task));
        let risk_level = priority;
        let suggestion = suggestion(risk_level, &key_themes).to_owned();

        AnalysisResult {
            key_themes,
            risk_level,
            priority,
            suggestion,
            requirements: REQUIREMENT_PLACEHOLDERS
                .iter()
                .map(|item| (*item).to_owned())
                .collect(),
            technical_analysis: TECHNICAL_PLACEHOLDER.to_owned(),
            business_impact: BUSINESS_PLACEHOLDER.to_owned(),
            next_steps: NEXT_STEPS_PLACEHOLDER.to_owned(),
            recommended_priority: Some(priority),
            recommended_components: Vec::new(),
            recommended_labels: Vec::new(),
            confidence: HEURISTIC_CONFIDENCE,
            llm_used: false,
        }
    }
}

/// Derives theme tags from summary words.
///
/// A word selects the first theme with a keyword it starts with. Themes are
/// returned in table order without duplicates.
#[must_use]
pub fn themes(summary: &str) -> Vec<String> {
    let matched: BTreeSet<&str> = summary
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter_map(|word| {
            THEMES
                .iter()
                .find(|(_, keywords)| keywords.iter().any(|keyword| word.starts_with(keyword)))
                .map(|(theme, _)| *theme)
        })
        .collect();

    if matched.is_empty() {
        return vec![DEFAULT_THEME.to_owned()];
    }
    THEMES
        .iter()
        .filter(|(theme, _)| matched.contains(theme))
        .map(|(theme, _)| (*theme).to_owned())
        .collect()
}

fn priority_token(task: &TicketTask) -> String {
    if !task.priority().trim().is_empty() {
        return task.priority().to_owned();
    }
    task.metadata()
        .iter()
        .find(|(key, value)| {
            let lowered = key.to_ascii_lowercase();
            !value.trim().is_empty() && PRIORITY_KEY_HINTS.iter().any(|hint| lowered.contains(hint))
        })
        .map_or_else(|| Level::Medium.as_str().to_owned(), |(_, value)| value.clone())
}

fn suggestion(risk: Level, themes: &[String]) -> &'static str {
    let has = |theme: &str| themes.iter().any(|candidate| candidate == theme);
    if risk == Level::High {
        "This is a high-priority item that should be addressed promptly."
    } else if has("problem") {
        "This issue should be investigated to determine its impact."
    } else if has("new_functionality") {
        "This new functionality should be evaluated for alignment with goals."
    } else if has("improvement") {
        "This improvement could enhance existing functionality."
    } else if has("documentation") {
        "This documentation should be reviewed for accuracy and completeness."
    } else {
        "Review this item and assign appropriate resources."
    }
}
