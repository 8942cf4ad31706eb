//! Producer-side encoding of ticket tasks.

use super::EncodeError;
use crate::ticket::domain::{DataPart, MessagePart, TicketTask, TransportMessage};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Part metadata key carrying the payload media type.
pub const CONTENT_TYPE_KEY: &str = "content-type";
/// Media type of JSON data parts.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Historical wire shapes a ticket task has been sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireShape {
    /// Canonical camelCase schema.
    Canonical,
    /// Renamed keys (`ticket_id`, `title`, `desc`).
    Aliased,
    /// Canonical document serialized into a JSON string.
    StringEncoded,
    /// Tracker-style `issue.fields` nesting.
    LegacyNested,
}

/// Encodes ticket tasks into transport messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskEncoder;

impl TaskEncoder {
    /// Encodes a task as one canonical data part.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when serialization fails.
    pub fn encode(task: &TicketTask) -> Result<TransportMessage, EncodeError> {
        Self::encode_as(task, WireShape::Canonical)
    }

    /// Encodes a task as one data part in the given wire shape.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when serialization fails.
    pub fn encode_as(task: &TicketTask, shape: WireShape) -> Result<TransportMessage, EncodeError> {
        let data = match shape {
            WireShape::Canonical => serde_json::to_value(task)?,
            WireShape::Aliased => aliased_document(task),
            WireShape::StringEncoded => Value::String(serde_json::to_string(task)?),
            WireShape::LegacyNested => legacy_document(task),
        };
        Ok(TransportMessage::new(vec![json_part(data)]))
    }

    /// Encodes a task as a JSON text part.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when serialization fails.
    #[deprecated(note = "use `TaskEncoder::encode`; text parts remain decodable for old peers")]
    pub fn encode_plain_text(task: &TicketTask) -> Result<TransportMessage, EncodeError> {
        Ok(TransportMessage::from_text(serde_json::to_string(task)?))
    }
}

/// Wraps a JSON value in a data part tagged as JSON.
#[must_use]
pub fn json_part(data: Value) -> MessagePart {
    MessagePart::Data(DataPart {
        data,
        metadata: BTreeMap::from([(CONTENT_TYPE_KEY.to_owned(), JSON_CONTENT_TYPE.to_owned())]),
    })
}

fn aliased_document(task: &TicketTask) -> Value {
    json!({
        "ticket_id": task.ticket_id(),
        "title": task.summary(),
        "desc": task.description(),
        "status": task.status(),
        "reporter": task.reporter(),
        "assignee": task.assignee(),
        "priority": task.priority(),
        "labels": task.labels(),
        "created": task.created(),
        "updated": task.updated(),
        "metadata": task.metadata(),
    })
}

fn legacy_document(task: &TicketTask) -> Value {
    let mut fields = Map::new();
    fields.insert("summary".to_owned(), json!(task.summary()));
    fields.insert("description".to_owned(), json!(task.description()));
    fields.insert("status".to_owned(), json!({ "name": task.status() }));
    fields.insert("reporter".to_owned(), json!({ "displayName": task.reporter() }));
    fields.insert("assignee".to_owned(), json!({ "displayName": task.assignee() }));
    fields.insert("priority".to_owned(), json!({ "name": task.priority() }));
    fields.insert("labels".to_owned(), json!(task.labels()));
    fields.insert("created".to_owned(), json!(task.created()));
    fields.insert("updated".to_owned(), json!(task.updated()));
    json!({
        "issue": {
            "key": task.ticket_id(),
            "fields": fields,
        },
        "metadata": task.metadata(),
    })
}
