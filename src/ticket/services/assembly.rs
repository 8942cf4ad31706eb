//! Assembly of ticket tasks from webhook events and tracker snapshots.

use crate::ticket::domain::{Ticket, TicketTask, TicketTaskError};
use crate::webhook::domain::WebhookEvent;
use serde_json::Value;
use std::collections::BTreeMap;

/// Tracker fields longer than this are left out of task metadata.
pub const MAX_EXTRA_FIELD_LEN: usize = 1000;

/// Builds [`TicketTask`] values from the data available on each side.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketTaskAssembler;

impl TicketTaskAssembler {
    /// Assembles a task from a webhook event and an optional ticket snapshot.
    ///
    /// Ticket fields take precedence; the event's custom fields fill gaps.
    ///
    /// # Errors
    ///
    /// Returns [`TicketTaskError`] when neither source yields a summary.
    pub fn from_webhook(
        event: &WebhookEvent,
        ticket: Option<&Ticket>,
    ) -> Result<TicketTask, TicketTaskError> {
        let custom = |name: &str| event.custom_fields.get(name).map(String::as_str);
        let pick = |from_ticket: Option<&str>, field: &str| {
            from_ticket
                .filter(|text| !text.trim().is_empty())
                .map(str::to_owned)
                .or_else(|| custom(field).map(display_text))
                .unwrap_or_default()
        };

        let summary = pick(ticket.map(|t| t.summary.as_str()), "summary");
        let labels = ticket
            .map(|t| t.labels.clone())
            .filter(|labels| !labels.is_empty())
            .unwrap_or_else(|| custom("labels").map(parse_labels).unwrap_or_default());

        let task = TicketTask::new(event.ticket_id.clone(), summary)?
            .with_description(pick(ticket.map(|t| t.description.as_str()), "description"))
            .with_status(pick(ticket.map(|t| t.status.as_str()), "status"))
            .with_reporter(pick(ticket.map(|t| t.reporter.as_str()), "reporter"))
            .with_assignee(pick(ticket.map(|t| t.assignee.as_str()), "assignee"))
            .with_priority(pick(ticket.map(|t| t.priority.as_str()), "priority"))
            .with_labels(labels)
            .with_created(pick(ticket.map(|t| t.created.as_str()), "created"))
            .with_updated(pick(ticket.map(|t| t.updated.as_str()), "updated"))
            .with_metadata(event_metadata(event));

        Ok(match ticket {
            Some(snapshot) => task.with_metadata(ticket_metadata(snapshot)),
            None => task,
        })
    }

    /// Fills empty task fields from a ticket snapshot.
    ///
    /// Existing task values and metadata entries are never overwritten.
    #[must_use]
    pub fn enrich(task: TicketTask, ticket: &Ticket) -> TicketTask {
        let fill = |current: &str, fetched: &str| {
            if current.trim().is_empty() {
                fetched.to_owned()
            } else {
                current.to_owned()
            }
        };
        let labels = if task.labels().is_empty() {
            ticket.labels.clone()
        } else {
            task.labels().to_vec()
        };
        let additions: Vec<(String, String)> = ticket_metadata(ticket)
            .into_iter()
            .filter(|(key, _)| !task.metadata().contains_key(key))
            .collect();

        let description = fill(task.description(), &ticket.description);
        let status = fill(task.status(), &ticket.status);
        let reporter = fill(task.reporter(), &ticket.reporter);
        let assignee = fill(task.assignee(), &ticket.assignee);
        let priority = fill(task.priority(), &ticket.priority);
        let created = fill(task.created(), &ticket.created);
        let updated = fill(task.updated(), &ticket.updated);
        task.with_description(description)
            .with_status(status)
            .with_reporter(reporter)
            .with_assignee(assignee)
            .with_priority(priority)
            .with_labels(labels)
            .with_created(created)
            .with_updated(updated)
            .with_metadata(additions)
    }
}

fn event_metadata(event: &WebhookEvent) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::from([
        ("event".to_owned(), event.event.to_string()),
        ("projectKey".to_owned(), event.project_key.clone()),
        ("webhookName".to_owned(), event.webhook_name.clone()),
        ("webhookTime".to_owned(), event.timestamp.to_rfc3339()),
    ]);
    if !event.user_name.is_empty() {
        metadata.insert("webhookUser".to_owned(), event.user_name.clone());
    }
    if !event.user_email.is_empty() {
        metadata.insert("userEmail".to_owned(), event.user_email.clone());
    }
    if let Some(comment) = &event.comment {
        metadata.insert("latestComment".to_owned(), comment.clone());
    }
    metadata.extend(
        event
            .changes
            .iter()
            .map(|(field, value)| (format!("change_{field}"), value.clone())),
    );
    metadata.extend(
        event
            .custom_fields
            .iter()
            .map(|(field, value)| (format!("custom_{field}"), value.clone())),
    );
    metadata
}

fn ticket_metadata(ticket: &Ticket) -> BTreeMap<String, String> {
    let mut metadata: BTreeMap<String, String> = ticket
        .extra_fields
        .iter()
        .filter(|(_, value)| !value.is_empty() && value.chars().count() < MAX_EXTRA_FIELD_LEN)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if !ticket.issue_type.is_empty() {
        metadata.insert("issueType".to_owned(), ticket.issue_type.clone());
    }
    if !ticket.components.is_empty() {
        metadata.insert("components".to_owned(), ticket.components.join(", "));
    }
    metadata
}

/// Reads a stringified tracker field, unwrapping `{name}`-style objects.
fn display_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => ["name", "displayName", "value"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map_or_else(|| raw.to_owned(), str::to_owned),
        _ => raw.to_owned(),
    }
}

fn parse_labels(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(labels) => labels,
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}
