//! Ordered decode strategies for ticket task payloads.
//!
//! Producers renamed and re-nested ticket fields across versions without a
//! shared schema. Each strategy recognizes one historical shape and either
//! yields a valid [`TicketTask`] or declines.

use crate::json_text::flatten;
use crate::ticket::domain::TicketTask;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One attempt at extracting a ticket task from a part payload.
///
/// Strategies are stateless and deterministic. A strategy returns `None`
/// whenever it cannot produce a task with a non-empty identifier and summary.
pub trait DecodeStrategy: Send + Sync {
    /// Returns the strategy name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to decode a ticket task from a JSON payload.
    fn decode(&self, payload: &Value) -> Option<TicketTask>;
}

/// Identity aliases, in precedence order.
pub const ID_ALIASES: &[&str] = &["ticketId", "ticket_id", "id"];
/// Summary aliases, in precedence order.
pub const SUMMARY_ALIASES: &[&str] = &["summary", "title", "name"];
/// Description aliases, in precedence order.
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "desc", "content", "body"];

const NAMED_FIELDS: &[&str] = &[
    "status", "reporter", "assignee", "priority", "labels", "created", "updated", "metadata",
];

/// Direct decode into the canonical wire schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredStrategy;

impl DecodeStrategy for StructuredStrategy {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn decode(&self, payload: &Value) -> Option<TicketTask> {
        if !payload.is_object() {
            return None;
        }
        TicketTask::deserialize(payload).ok()
    }
}

/// Key/value decode tolerant of renamed fields.
///
/// Unrecognized keys are preserved as metadata, and a nested `metadata`
/// object is merged over them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasedStrategy;

impl DecodeStrategy for AliasedStrategy {
    fn name(&self) -> &'static str {
        "aliased"
    }

    fn decode(&self, payload: &Value) -> Option<TicketTask> {
        let object = payload.as_object()?;
        let (id_key, ticket_id) = first_text(object, ID_ALIASES)?;
        let (summary_key, summary) = first_text(object, SUMMARY_ALIASES)?;
        let description = DESCRIPTION_ALIASES
            .iter()
            .find_map(|alias| {
                object
                    .get(*alias)
                    .filter(|value| !value.is_null())
                    .map(|value| (*alias, flatten(value)))
            });
        let description_key = description.as_ref().map(|(alias, _)| *alias);

        let consumed = |key: &str| {
            key == id_key
                || key == summary_key
                || description_key == Some(key)
                || NAMED_FIELDS.contains(&key)
        };
        let mut metadata: BTreeMap<String, String> = object
            .iter()
            .filter(|(key, value)| !consumed(key.as_str()) && !value.is_null())
            .map(|(key, value)| (key.clone(), flatten(value)))
            .collect();
        match object.get("metadata") {
            Some(Value::Object(nested)) => metadata.extend(flatten_map(nested)),
            Some(Value::Null) | None => {}
            Some(other) => {
                metadata.insert("metadata".to_owned(), flatten(other));
            }
        }

        let task = TicketTask::new(ticket_id, summary)
            .ok()?
            .with_description(description.map(|(_, text)| text).unwrap_or_default())
            .with_status(display_name(object.get("status")))
            .with_reporter(display_name(object.get("reporter")))
            .with_assignee(display_name(object.get("assignee")))
            .with_priority(display_name(object.get("priority")))
            .with_labels(labels_of(object.get("labels")))
            .with_created(field_text(object, "created"))
            .with_updated(field_text(object, "updated"))
            .with_metadata(metadata);
        Some(task)
    }
}

/// One-level unwrap of a JSON document carried as a JSON string.
///
/// The unwrapped document is decoded with the non-recursive strategies, so
/// doubly-encoded payloads are rejected.
pub struct StringEncodedStrategy {
    inner: Vec<Box<dyn DecodeStrategy>>,
}

impl StringEncodedStrategy {
    /// Creates the strategy with the standard inner strategies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: vec![
                Box::new(StructuredStrategy),
                Box::new(AliasedStrategy),
                Box::new(LegacyNestedStrategy),
            ],
        }
    }
}

impl Default for StringEncodedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeStrategy for StringEncodedStrategy {
    fn name(&self) -> &'static str {
        "string_encoded"
    }

    fn decode(&self, payload: &Value) -> Option<TicketTask> {
        let Value::String(encoded) = payload else {
            return None;
        };
        let document: Value = serde_json::from_str(encoded).ok()?;
        self.inner
            .iter()
            .find_map(|strategy| strategy.decode(&document))
    }
}

/// Decode of the tracker's nested `issue.fields` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyNestedStrategy;

const LEGACY_KNOWN_FIELDS: &[&str] = &[
    "summary",
    "description",
    "status",
    "reporter",
    "assignee",
    "priority",
    "labels",
    "created",
    "updated",
];

impl DecodeStrategy for LegacyNestedStrategy {
    fn name(&self) -> &'static str {
        "legacy_nested"
    }

    fn decode(&self, payload: &Value) -> Option<TicketTask> {
        let issue = payload.get("issue")?.as_object()?;
        let (_, ticket_id) = first_text(issue, &["key", "id"])?;
        let empty = Map::new();
        let fields = issue
            .get("fields")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let (_, summary) = first_text(fields, &["summary"])?;

        let mut metadata: BTreeMap<String, String> = fields
            .iter()
            .filter(|(key, value)| !LEGACY_KNOWN_FIELDS.contains(&key.as_str()) && !value.is_null())
            .map(|(key, value)| (key.clone(), flatten(value)))
            .collect();
        if let Some(Value::Object(nested)) = payload.get("metadata") {
            metadata.extend(flatten_map(nested));
        }

        let task = TicketTask::new(ticket_id, summary)
            .ok()?
            .with_description(field_text(fields, "description"))
            .with_status(display_name(fields.get("status")))
            .with_reporter(display_name(fields.get("reporter")))
            .with_assignee(display_name(fields.get("assignee")))
            .with_priority(display_name(fields.get("priority")))
            .with_labels(labels_of(fields.get("labels")))
            .with_created(field_text(fields, "created"))
            .with_updated(field_text(fields, "updated"))
            .with_metadata(metadata);
        Some(task)
    }
}

/// Returns the first alias holding non-blank text, with the alias used.
fn first_text<'a>(object: &Map<String, Value>, aliases: &[&'a str]) -> Option<(&'a str, String)> {
    aliases.iter().find_map(|alias| {
        let text = match object.get(*alias)? {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
        };
        (!text.trim().is_empty()).then_some((*alias, text))
    })
}

fn field_text(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).map(flatten).unwrap_or_default()
}

/// Reads a field that may be a plain string or a `{name}`/`{displayName}` object.
fn display_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(object)) => ["name", "displayName", "value"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_default(),
        Some(other) => flatten(other),
        None => String::new(),
    }
}

/// Reads labels given either as an array or as a comma-separated string.
///
/// Array items are kept as sent; only the joined form drops blank entries.
fn labels_of(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(flatten).collect(),
        Some(Value::String(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn flatten_map(object: &Map<String, Value>) -> impl Iterator<Item = (String, String)> + '_ {
    object
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), flatten(value)))
}
