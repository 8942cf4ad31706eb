//! Ticket snapshot returned by the ticket store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ticket details as fetched from the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ticket {
    /// Ticket key.
    pub key: String,
    /// One-line summary.
    pub summary: String,
    /// Long-form description.
    pub description: String,
    /// Workflow status name.
    pub status: String,
    /// Priority name.
    pub priority: String,
    /// Issue type name.
    pub issue_type: String,
    /// Reporter display name.
    pub reporter: String,
    /// Assignee display name.
    pub assignee: String,
    /// Labels.
    pub labels: Vec<String>,
    /// Component names.
    pub components: Vec<String>,
    /// Creation timestamp text.
    pub created: String,
    /// Last-update timestamp text.
    pub updated: String,
    /// Any further tracker fields, stringified.
    pub extra_fields: BTreeMap<String, String>,
}

impl Ticket {
    /// Creates a ticket snapshot with a key and summary.
    #[must_use]
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }
}

/// Reference to a comment created on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRef {
    /// Tracker-assigned comment identifier.
    pub id: String,
    /// Browser URL of the comment.
    pub url: String,
}
