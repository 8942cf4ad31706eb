//! Transport message parts exchanged with the peer process.
//!
//! Messages are an ordered list of parts. Text parts carry free text (often
//! a JSON document serialized as text); data parts carry a JSON value.
//!
//! ```json
//! { "type": "text", "text": "Processing task..." }
//! { "type": "data", "data": { "ticketId": "PROJ-1" }, "metadata": {} }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single part of a transport message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Free text.
    Text(TextPart),
    /// Structured JSON data.
    Data(DataPart),
}

impl MessagePart {
    /// Creates a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart { text: text.into() })
    }

    /// Creates a data part without metadata.
    #[must_use]
    pub const fn data(data: Value) -> Self {
        Self::Data(DataPart {
            data,
            metadata: BTreeMap::new(),
        })
    }

    /// Returns the kind label used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Data(_) => "data",
        }
    }

    /// Returns the JSON payload of the part.
    ///
    /// Data parts yield their value. Text parts yield the parsed JSON
    /// document, or the text itself as a JSON string when it is not JSON.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::Data(part) => part.data.clone(),
            Self::Text(part) => serde_json::from_str(&part.text)
                .unwrap_or_else(|_| Value::String(part.text.clone())),
        }
    }
}

/// Text content within a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    /// The text content.
    pub text: String,
}

/// Structured content within a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPart {
    /// The JSON value.
    pub data: Value,
    /// Part-level metadata such as the content type.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// An ordered list of message parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportMessage {
    /// Parts in transmission order.
    pub parts: Vec<MessagePart>,
}

impl TransportMessage {
    /// Creates a message from parts.
    #[must_use]
    pub const fn new(parts: Vec<MessagePart>) -> Self {
        Self { parts }
    }

    /// Creates a message holding a single text part.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![MessagePart::text(text)])
    }

    /// Returns the concatenated text of all text parts.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text(text) => Some(text.text.as_str()),
                MessagePart::Data(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
