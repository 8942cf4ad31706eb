//! Three-bucket risk and priority scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk or priority bucket.
///
/// Deserialization accepts any token and normalizes it with
/// [`Level::normalize`], so foreign vocabularies never fail a decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    /// Needs prompt attention.
    High,
    /// Normal handling.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

const HIGH_TOKENS: &[&str] = &[
    "high", "critical", "severe", "important", "urgent", "blocker", "highest",
];
const LOW_TOKENS: &[&str] = &["low", "minor", "trivial", "lowest"];
const MEDIUM_TOKENS: &[&str] = &["medium", "moderate", "normal"];

impl Level {
    /// Maps an arbitrary token to a bucket.
    ///
    /// Exact keyword matches win, then whole-word matches in the order high,
    /// low, medium. Anything unrecognized is [`Level::Medium`]. The mapping
    /// is total and idempotent.
    #[must_use]
    pub fn normalize(token: &str) -> Self {
        let lowered = token.trim().to_ascii_lowercase();
        let words: Vec<&str> = lowered
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        let exact = |tokens: &[&str]| tokens.contains(&lowered.as_str());
        let partial = |tokens: &[&str]| words.iter().any(|word| tokens.contains(word));

        if exact(HIGH_TOKENS) {
            Self::High
        } else if exact(LOW_TOKENS) {
            Self::Low
        } else if exact(MEDIUM_TOKENS) {
            Self::Medium
        } else if partial(HIGH_TOKENS) {
            Self::High
        } else if partial(LOW_TOKENS) {
            Self::Low
        } else {
            Self::Medium
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Returns the name with an initial capital, for display.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl From<String> for Level {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<Level> for String {
    fn from(value: Level) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
