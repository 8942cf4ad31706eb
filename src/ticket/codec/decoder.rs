//! Chain-of-responsibility decoder for ticket task messages.

use super::{
    DecodeError,
    strategy::{
        AliasedStrategy, DecodeStrategy, LegacyNestedStrategy, StringEncodedStrategy,
        StructuredStrategy,
    },
};
use crate::ticket::domain::{MessagePart, TicketTask, TransportMessage};
use serde_json::Value;

/// Decodes ticket tasks by trying each strategy against every part.
///
/// A strategy is tried against all parts, in part order, before the next
/// strategy is consulted. The first task produced wins.
pub struct TaskDecoder {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl TaskDecoder {
    /// Creates a decoder with the standard strategy chain: structured,
    /// aliased, string-encoded, legacy nested.
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredStrategy),
            Box::new(AliasedStrategy),
            Box::new(StringEncodedStrategy::new()),
            Box::new(LegacyNestedStrategy),
        ])
    }

    /// Creates a decoder with a custom strategy chain.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn DecodeStrategy>>) -> Self {
        Self { strategies }
    }

    /// Returns the strategy names in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// Decodes a ticket task from a message.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoParts`] for an empty message and
    /// [`DecodeError::Exhausted`] when no strategy yields a valid task.
    pub fn decode(&self, message: &TransportMessage) -> Result<TicketTask, DecodeError> {
        if message.parts.is_empty() {
            return Err(DecodeError::NoParts);
        }
        let payloads: Vec<Value> = message.parts.iter().map(MessagePart::payload).collect();

        for strategy in &self.strategies {
            for (index, payload) in payloads.iter().enumerate() {
                if let Some(task) = strategy.decode(payload) {
                    tracing::debug!(
                        strategy = strategy.name(),
                        part = index,
                        ticket_id = task.ticket_id(),
                        "decoded ticket task"
                    );
                    return Ok(task);
                }
            }
        }

        let examined = describe_parts(&message.parts);
        tracing::warn!(%examined, "no decode strategy matched");
        Err(DecodeError::Exhausted { examined })
    }
}

impl Default for TaskDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_parts(parts: &[MessagePart]) -> String {
    parts
        .iter()
        .enumerate()
        .map(|(index, part)| format!("part {index} ({})", part.kind()))
        .collect::<Vec<_>>()
        .join(", ")
}
