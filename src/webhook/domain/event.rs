//! Canonical webhook event and its event-kind vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Simplified event kind derived from the tracker's raw event string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A ticket was created.
    Created,
    /// A ticket was updated.
    Updated,
    /// A comment was added to a ticket.
    Commented,
    /// A ticket was deleted.
    Deleted,
    /// Any event kind without a dedicated variant.
    Other(String),
}

const VENDOR_EVENTS: &[(&str, EventKind)] = &[
    ("jira:issue_created", EventKind::Created),
    ("jira:issue_updated", EventKind::Updated),
    ("jira:issue_commented", EventKind::Commented),
    ("jira:issue_deleted", EventKind::Deleted),
];

impl EventKind {
    /// Maps a vendor event string such as `jira:issue_created`.
    ///
    /// Unknown strings degrade to the text after the first colon, then to
    /// the raw string, so new upstream event types never fail normalization.
    #[must_use]
    pub fn from_vendor(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some((_, kind)) = VENDOR_EVENTS.iter().find(|(name, _)| *name == trimmed) {
            return kind.clone();
        }
        let simplified = trimmed
            .split_once(':')
            .map_or(trimmed, |(_, suffix)| suffix);
        Self::from(simplified.to_owned())
    }

    /// Returns the simplified event name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Commented => "commented",
            Self::Deleted => "deleted",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Self::Created,
            "updated" => Self::Updated,
            "commented" => Self::Commented,
            "deleted" => Self::Deleted,
            _ => Self::Other(value),
        }
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical representation of an inbound ticket notification.
///
/// Created on receipt and consumed immediately by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Ticket key, for example `PROJ-123`.
    pub ticket_id: String,
    /// Simplified event kind.
    pub event: EventKind,
    /// User who triggered the event.
    pub user_name: String,
    /// Email of the user who triggered the event.
    pub user_email: String,
    /// Project key derived from the ticket key.
    pub project_key: String,
    /// Changed fields mapped to their new values.
    pub changes: BTreeMap<String, String>,
    /// Every ticket field carried by the notification, stringified.
    pub custom_fields: BTreeMap<String, String>,
    /// Raw event name as sent by the tracker.
    pub webhook_name: String,
    /// Comment body for comment events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// When the tracker emitted the event.
    pub timestamp: DateTime<Utc>,
}

impl WebhookEvent {
    /// Creates an event with empty optional data.
    #[must_use]
    pub fn new(ticket_id: impl Into<String>, event: EventKind, timestamp: DateTime<Utc>) -> Self {
        let id = ticket_id.into();
        Self {
            project_key: project_key_of(&id).to_owned(),
            ticket_id: id,
            event,
            user_name: String::new(),
            user_email: String::new(),
            changes: BTreeMap::new(),
            custom_fields: BTreeMap::new(),
            webhook_name: String::new(),
            comment: None,
            timestamp,
        }
    }
}

/// Returns the project key of a ticket key: the text before its first hyphen.
#[must_use]
pub fn project_key_of(ticket_id: &str) -> &str {
    ticket_id
        .split_once('-')
        .map_or(ticket_id, |(project, _)| project)
}
