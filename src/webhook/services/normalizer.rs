//! Normalization of vendor-shaped and flat webhook payloads.
//!
//! Two payload shapes are accepted. A document whose `issue` member is an
//! object is decoded against the tracker's native webhook schema; anything
//! else is read as the simplified flat shape used by internal producers.

use crate::json_text::flatten;
use crate::webhook::domain::{EventKind, WebhookError, WebhookEvent};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Converts raw notification bodies into [`WebhookEvent`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookNormalizer;

impl WebhookNormalizer {
    /// Normalizes a raw webhook body.
    ///
    /// The clock supplies the timestamp when the payload carries none.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] when the body is empty, is not a JSON object,
    /// or lacks a ticket identifier or event type.
    pub fn normalize(body: &[u8], clock: &impl Clock) -> Result<WebhookEvent, WebhookError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(WebhookError::EmptyBody);
        }
        let document: Value = serde_json::from_slice(body)
            .map_err(|err| WebhookError::InvalidJson(err.to_string()))?;
        let Value::Object(object) = document else {
            return Err(WebhookError::NotAnObject);
        };

        if object.get("issue").is_some_and(Value::is_object) {
            normalize_vendor(object, clock)
        } else {
            normalize_flat(object, clock)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VendorPayload {
    #[serde(default)]
    timestamp: Value,
    issue: VendorIssue,
    #[serde(default)]
    user: Option<VendorUser>,
    #[serde(default)]
    changelog: Option<VendorChangelog>,
    #[serde(default)]
    comment: Option<VendorComment>,
    #[serde(default)]
    webhook_event: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VendorIssue {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VendorUser {
    name: Option<String>,
    display_name: Option<String>,
    email_address: Option<String>,
}

impl VendorUser {
    fn into_name_and_email(self) -> (String, String) {
        let name = non_blank(self.name)
            .or_else(|| non_blank(self.display_name))
            .unwrap_or_default();
        (name, self.email_address.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct VendorChangelog {
    #[serde(default)]
    items: Option<Vec<ChangelogItem>>,
}

#[derive(Debug, Deserialize)]
struct ChangelogItem {
    #[serde(default)]
    field: Option<String>,
    #[serde(default, rename = "toString")]
    new_value: Option<String>,
}

/// Comment body: plain text, or a rich-text document flattened to text.
#[derive(Debug, Deserialize)]
struct VendorComment {
    #[serde(default)]
    body: Value,
}

fn normalize_vendor(
    object: Map<String, Value>,
    clock: &impl Clock,
) -> Result<WebhookEvent, WebhookError> {
    let payload: VendorPayload = serde_json::from_value(Value::Object(object))
        .map_err(|err| WebhookError::InvalidJson(err.to_string()))?;

    let ticket_id = non_blank(payload.issue.key).ok_or(WebhookError::MissingTicketId)?;
    let raw_event = non_blank(payload.webhook_event).ok_or(WebhookError::MissingEvent)?;
    let timestamp = parse_timestamp(&payload.timestamp).unwrap_or_else(|| clock.utc());

    let mut event = WebhookEvent::new(ticket_id, EventKind::from_vendor(&raw_event), timestamp);
    if let Some(user) = payload.user {
        (event.user_name, event.user_email) = user.into_name_and_email();
    }
    event.changes = payload
        .changelog
        .and_then(|changelog| changelog.items)
        .map(|items| {
            items
                .into_iter()
                .map(|item| {
                    (
                        item.field.unwrap_or_default(),
                        item.new_value.unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    event.custom_fields = payload
        .issue
        .fields
        .as_ref()
        .map(flatten_fields)
        .unwrap_or_default();
    event.comment = payload
        .comment
        .map(|comment| flatten(&comment.body))
        .filter(|body| !body.trim().is_empty());
    event.webhook_name = raw_event;
    Ok(event)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FlatPayload {
    ticket_id: Option<String>,
    event: Option<String>,
    user_name: Option<String>,
    user_email: Option<String>,
    project_key: Option<String>,
    changes: Map<String, Value>,
    custom_fields: Map<String, Value>,
    webhook_name: Option<String>,
    comment: Option<String>,
    timestamp: Value,
}

fn normalize_flat(
    object: Map<String, Value>,
    clock: &impl Clock,
) -> Result<WebhookEvent, WebhookError> {
    let payload: FlatPayload = serde_json::from_value(Value::Object(object))
        .map_err(|err| WebhookError::InvalidJson(err.to_string()))?;

    let ticket_id = non_blank(payload.ticket_id).ok_or(WebhookError::MissingTicketId)?;
    let raw_event = non_blank(payload.event).ok_or(WebhookError::MissingEvent)?;
    let timestamp = parse_timestamp(&payload.timestamp).unwrap_or_else(|| clock.utc());

    let mut event = WebhookEvent::new(ticket_id, EventKind::from(raw_event.clone()), timestamp);
    if let Some(project_key) = non_blank(payload.project_key) {
        event.project_key = project_key;
    }
    event.user_name = payload.user_name.unwrap_or_default();
    event.user_email = payload.user_email.unwrap_or_default();
    event.changes = payload
        .changes
        .iter()
        .map(|(field, value)| (field.clone(), flatten(value)))
        .collect();
    event.custom_fields = flatten_fields(&payload.custom_fields);
    event.webhook_name = non_blank(payload.webhook_name).unwrap_or(raw_event);
    event.comment = non_blank(payload.comment);
    Ok(event)
}

fn flatten_fields(fields: &Map<String, Value>) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.clone(), flatten(value)))
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .filter(|millis| *millis > 0)
            .and_then(DateTime::from_timestamp_millis),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
