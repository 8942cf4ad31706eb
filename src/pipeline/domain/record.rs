//! Status updates, artifacts and the result reported to the requester.

use super::TaskStatus;
use crate::analysis::domain::{AnalysisResult, CollectedFields, field};
use crate::ticket::codec::json_part;
use crate::ticket::domain::{MessagePart, TransportMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Status notification emitted on every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Status entered.
    pub state: TaskStatus,
    /// Optional human-readable or structured message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<TransportMessage>,
    /// When the status was entered.
    pub timestamp: DateTime<Utc>,
}

impl StatusUpdate {
    /// Creates an update without a message.
    #[must_use]
    pub const fn new(state: TaskStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            state,
            message: None,
            timestamp,
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: TransportMessage) -> Self {
        self.message = Some(message);
        self
    }

    /// Returns the concatenated text of the message, if any.
    #[must_use]
    pub fn message_text(&self) -> Option<String> {
        self.message.as_ref().map(TransportMessage::text_content)
    }
}

/// Named output attached to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Content parts.
    pub parts: Vec<MessagePart>,
    /// Artifact metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Artifact {
    /// Creates an artifact holding a single text part.
    #[must_use]
    pub fn text(
        name: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parts: vec![MessagePart::text(text)],
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Failure to read an [`InfoResult`] from a message.
#[derive(Debug, Error)]
pub enum InfoResultError {
    /// No part carried a recognizable result.
    #[error("message carries no analysis result")]
    Missing,

    /// JSON encoding failed.
    #[error("failed to encode analysis result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outcome of a run, reported back to the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResult {
    /// Ticket key.
    pub ticket_id: String,
    /// Structured analysis.
    pub analysis_result: AnalysisResult,
    /// Analysis digest.
    #[serde(default)]
    pub summary: String,
    /// URL of the posted comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_url: Option<String>,
}

impl InfoResult {
    /// Encodes the result as a single JSON data part.
    ///
    /// # Errors
    ///
    /// Returns [`InfoResultError::Encode`] when serialization fails.
    pub fn encode(&self) -> Result<TransportMessage, InfoResultError> {
        Ok(TransportMessage::new(vec![json_part(serde_json::to_value(
            self,
        )?)]))
    }

    /// Reads a result from a message, accepting older shapes.
    ///
    /// Each part is tried in order. Besides the canonical shape, a part may
    /// carry the analysis as a flat `collectedFields` map or as a flat
    /// string map under `analysisResult`.
    ///
    /// # Errors
    ///
    /// Returns [`InfoResultError::Missing`] when no part matches.
    pub fn decode(message: &TransportMessage) -> Result<Self, InfoResultError> {
        message
            .parts
            .iter()
            .find_map(|part| Self::from_value(&part.payload()))
            .ok_or(InfoResultError::Missing)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let ticket_id = object
            .get("ticketId")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())?
            .to_owned();
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);

        let analysis_result = match (object.get("analysisResult"), object.get("collectedFields")) {
            (Some(Value::Object(analysis)), _) if is_flat_map(analysis) => {
                AnalysisResult::from_collected_fields(&to_fields(analysis))
            }
            (Some(analysis @ Value::Object(_)), _) => {
                serde_json::from_value(analysis.clone()).ok()?
            }
            (_, Some(Value::Object(fields))) => {
                AnalysisResult::from_collected_fields(&to_fields(fields))
            }
            _ => return None,
        };

        Some(Self {
            ticket_id,
            analysis_result,
            summary: text("summary").unwrap_or_default(),
            comment_url: text("commentUrl").filter(|url| !url.is_empty()),
        })
    }
}

const FLAT_KEYS: &[&str] = &[
    field::KEY_THEMES,
    field::RISK_LEVEL,
    field::PRIORITY,
    field::SUGGESTION,
];

fn is_flat_map(object: &Map<String, Value>) -> bool {
    object.values().all(Value::is_string)
        && FLAT_KEYS.iter().any(|key| object.contains_key(*key))
}

fn to_fields(object: &Map<String, Value>) -> CollectedFields {
    object
        .iter()
        .map(|(key, value)| (key.clone(), crate::json_text::flatten(value)))
        .collect()
}
