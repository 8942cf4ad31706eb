//! Validated ticket task exchanged between producer and analyzer.

use super::TicketTaskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical wire schema of a ticket task.
///
/// Every member is optional on input so that incomplete documents reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketTaskWire {
    /// Ticket key.
    pub ticket_id: String,
    /// One-line ticket summary.
    pub summary: String,
    /// Long-form description.
    pub description: String,
    /// Workflow status name.
    pub status: String,
    /// Reporter display name.
    pub reporter: String,
    /// Assignee display name.
    pub assignee: String,
    /// Priority name as the tracker reports it.
    pub priority: String,
    /// Ticket labels.
    pub labels: Vec<String>,
    /// Creation timestamp as reported by the tracker.
    pub created: String,
    /// Last-update timestamp as reported by the tracker.
    pub updated: String,
    /// Additional string metadata.
    pub metadata: BTreeMap<String, String>,
}

/// A ticket task whose identifier and summary are guaranteed non-empty.
///
/// Values can only be obtained through [`TicketTask::new`] or validated
/// deserialization, so an invalid task never travels downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketTaskWire", into = "TicketTaskWire")]
pub struct TicketTask {
    ticket_id: String,
    summary: String,
    description: String,
    status: String,
    reporter: String,
    assignee: String,
    priority: String,
    labels: Vec<String>,
    created: String,
    updated: String,
    metadata: BTreeMap<String, String>,
}

impl TicketTask {
    /// Creates a task from its required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TicketTaskError`] when the identifier or summary is blank.
    pub fn new(
        ticket_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Result<Self, TicketTaskError> {
        let id = ticket_id.into();
        let title = summary.into();
        if id.trim().is_empty() {
            return Err(TicketTaskError::EmptyTicketId);
        }
        if title.trim().is_empty() {
            return Err(TicketTaskError::EmptySummary { ticket_id: id });
        }
        Ok(Self {
            ticket_id: id,
            summary: title,
            description: String::new(),
            status: String::new(),
            reporter: String::new(),
            assignee: String::new(),
            priority: String::new(),
            labels: Vec::new(),
            created: String::new(),
            updated: String::new(),
            metadata: BTreeMap::new(),
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the workflow status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = reporter.into();
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    /// Sets the priority name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Sets the creation timestamp text.
    #[must_use]
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = created.into();
        self
    }

    /// Sets the last-update timestamp text.
    #[must_use]
    pub fn with_updated(mut self, updated: impl Into<String>) -> Self {
        self.updated = updated.into();
        self
    }

    /// Adds or replaces one metadata entry.
    #[must_use]
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merges metadata entries, replacing existing keys.
    #[must_use]
    pub fn with_metadata(mut self, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        self.metadata.extend(entries);
        self
    }

    /// Returns the ticket key.
    #[must_use]
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the workflow status.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the reporter.
    #[must_use]
    pub fn reporter(&self) -> &str {
        &self.reporter
    }

    /// Returns the assignee.
    #[must_use]
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Returns the priority name.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Returns the labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the creation timestamp text.
    #[must_use]
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Returns the last-update timestamp text.
    #[must_use]
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}

impl TryFrom<TicketTaskWire> for TicketTask {
    type Error = TicketTaskError;

    fn try_from(wire: TicketTaskWire) -> Result<Self, Self::Error> {
        Ok(Self::new(wire.ticket_id, wire.summary)?
            .with_description(wire.description)
            .with_status(wire.status)
            .with_reporter(wire.reporter)
            .with_assignee(wire.assignee)
            .with_priority(wire.priority)
            .with_labels(wire.labels)
            .with_created(wire.created)
            .with_updated(wire.updated)
            .with_metadata(wire.metadata))
    }
}

impl From<TicketTask> for TicketTaskWire {
    fn from(task: TicketTask) -> Self {
        Self {
            ticket_id: task.ticket_id,
            summary: task.summary,
            description: task.description,
            status: task.status,
            reporter: task.reporter,
            assignee: task.assignee,
            priority: task.priority,
            labels: task.labels,
            created: task.created,
            updated: task.updated,
            metadata: task.metadata,
        }
    }
}
