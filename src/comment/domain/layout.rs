//! Intermediate comment structure, independent of markup.

use serde::Serialize;

/// A named field within a comment section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentEntry {
    /// Field name.
    pub name: String,
    /// Display value.
    pub value: String,
}

/// A titled group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentSection {
    /// Section title.
    pub title: String,
    /// Entries in display order.
    pub entries: Vec<CommentEntry>,
}

/// Everything a rendered comment shows, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentLayout {
    /// Italic notice shown under the header.
    pub notice: Option<String>,
    /// Highlighted primary suggestion.
    pub suggestion: Option<String>,
    /// Non-empty sections.
    pub sections: Vec<CommentSection>,
}

impl CommentLayout {
    /// Adds a notice shown under the header.
    #[must_use]
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Counts the fields carried by the layout, suggestion included.
    #[must_use]
    pub fn field_count(&self) -> usize {
        usize::from(self.suggestion.is_some())
            + self
                .sections
                .iter()
                .map(|section| section.entries.len())
                .sum::<usize>()
    }
}
