//! Rendering of analysis fields into tracker comments.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::templates::{COMMENT_TEMPLATE, DIGEST_TEMPLATE, render};
use crate::analysis::{
    domain::{AnalysisResult, CollectedFields, field},
    services::capitalize,
};
use crate::comment::domain::{CommentEntry, CommentError, CommentLayout, CommentSection};
use crate::ticket::domain::TicketTask;

/// Title of the section collecting uncategorized fields.
pub const OTHER_SECTION_TITLE: &str = "Other Analysis Details";

/// Fixed categories and the field names bound to each, in display order.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Technical Analysis",
        &[field::TECHNICAL_ANALYSIS, "CodeReview", "ArchitectureImpact"],
    ),
    (
        "Business Impact",
        &[field::BUSINESS_IMPACT, "UserImpact", "CustomerImpact"],
    ),
    (
        "Recommendations",
        &[
            field::RECOMMENDED_PRIORITY,
            field::RECOMMENDED_COMPONENTS,
            field::RECOMMENDED_LABELS,
            field::NEXT_STEPS,
        ],
    ),
    (
        "Additional Information",
        &["References", "RelatedTickets", "Context"],
    ),
];

const LLM_NOTE: &str = "This analysis was generated with AI assistance.";
const HEURISTIC_NOTE: &str =
    "This analysis was generated using basic heuristics. Enable LLM for more detailed analysis.";

/// Turns analysis output into human-readable comment text.
///
/// Rendering is a pure function of its inputs: the generation timestamp is
/// passed in rather than read from a clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentSynthesizer;

#[derive(Serialize)]
struct CommentContext<'a> {
    notice: Option<&'a str>,
    suggestion: Option<&'a str>,
    sections: &'a [CommentSection],
    generated_at: String,
}

#[derive(Serialize)]
struct DigestContext<'a> {
    ticket_id: &'a str,
    summary: &'a str,
    themes: Vec<String>,
    risk: &'static str,
    priority: &'static str,
    technical_analysis: &'a str,
    business_impact: &'a str,
    requirements: &'a [String],
    recommended_priority: Option<&'static str>,
    components: &'a [String],
    labels: &'a [String],
    next_steps: &'a str,
    suggestion: &'a str,
    method_note: &'static str,
}

impl CommentSynthesizer {
    /// Arranges fields into the comment layout.
    ///
    /// The suggestion is lifted out first, categorized fields follow in
    /// category order, and every remaining field lands in
    /// [`OTHER_SECTION_TITLE`] in key order. Blank values are dropped.
    #[must_use]
    pub fn layout(self, fields: &CollectedFields) -> CommentLayout {
        let present = |name: &str| {
            fields
                .get(name)
                .filter(|value| !value.trim().is_empty())
                .cloned()
        };
        let entry = |name: &str| {
            present(name).map(|value| CommentEntry {
                name: name.to_owned(),
                value,
            })
        };

        let mut sections: Vec<CommentSection> = CATEGORIES
            .iter()
            .map(|(title, names)| CommentSection {
                title: (*title).to_owned(),
                entries: names.iter().filter_map(|name| entry(name)).collect(),
            })
            .filter(|section| !section.entries.is_empty())
            .collect();

        let other: Vec<CommentEntry> = fields
            .keys()
            .filter(|name| !is_placed(name))
            .filter_map(|name| entry(name))
            .collect();
        if !other.is_empty() {
            sections.push(CommentSection {
                title: OTHER_SECTION_TITLE.to_owned(),
                entries: other,
            });
        }

        CommentLayout {
            notice: None,
            suggestion: present(field::SUGGESTION),
            sections,
        }
    }

    /// Renders a layout to comment text.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::Render`] when template rendering fails.
    pub fn render(
        self,
        layout: &CommentLayout,
        generated_at: DateTime<Utc>,
    ) -> Result<String, CommentError> {
        render(
            "comment",
            COMMENT_TEMPLATE,
            CommentContext {
                notice: layout.notice.as_deref(),
                suggestion: layout.suggestion.as_deref(),
                sections: &layout.sections,
                generated_at: rfc1123(generated_at),
            },
        )
    }

    /// Lays out and renders fields in one step.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::Render`] when template rendering fails.
    pub fn format(
        self,
        fields: &CollectedFields,
        generated_at: DateTime<Utc>,
    ) -> Result<String, CommentError> {
        self.render(&self.layout(fields), generated_at)
    }

    /// Renders an analysis through its flat field view.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::Render`] when template rendering fails.
    pub fn format_analysis(
        self,
        analysis: &AnalysisResult,
        generated_at: DateTime<Utc>,
    ) -> Result<String, CommentError> {
        self.format(&analysis.to_collected_fields(), generated_at)
    }

    /// Renders the prose digest of an analysis.
    ///
    /// The recommended priority is shown only when it differs from the
    /// priority.
    ///
    /// # Errors
    ///
    /// Returns [`CommentError::Render`] when template rendering fails.
    pub fn digest(
        self,
        task: &TicketTask,
        analysis: &AnalysisResult,
    ) -> Result<String, CommentError> {
        let context = DigestContext {
            ticket_id: task.ticket_id(),
            summary: task.summary(),
            themes: analysis.key_themes.iter().map(|theme| capitalize(theme)).collect(),
            risk: analysis.risk_level.title(),
            priority: analysis.priority.title(),
            technical_analysis: &analysis.technical_analysis,
            business_impact: &analysis.business_impact,
            requirements: &analysis.requirements,
            recommended_priority: analysis
                .recommended_priority
                .filter(|recommended| *recommended != analysis.priority)
                .map(|recommended| recommended.title()),
            components: &analysis.recommended_components,
            labels: &analysis.recommended_labels,
            next_steps: &analysis.next_steps,
            suggestion: &analysis.suggestion,
            method_note: if analysis.llm_used {
                LLM_NOTE
            } else {
                HEURISTIC_NOTE
            },
        };
        render("digest", DIGEST_TEMPLATE, context)
    }
}

fn is_placed(name: &str) -> bool {
    name == field::SUGGESTION
        || CATEGORIES
            .iter()
            .any(|(_, names)| names.contains(&name))
}

/// Formats a timestamp as `Mon, 02 Jan 2006 15:04:05 UTC`.
fn rfc1123(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S UTC").to_string()
}
