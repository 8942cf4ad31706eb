//! Task status state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally visible status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The trigger has been accepted.
    Received,
    /// The input is being decoded.
    Processing,
    /// Ticket details are being fetched.
    FetchingDetails,
    /// The ticket is being analyzed.
    Analyzing,
    /// The digest and comment are being rendered.
    GeneratingSummary,
    /// The comment is being posted.
    PostingComment,
    /// The run finished successfully.
    Completed,
    /// The run failed.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Processing => "processing",
            Self::FetchingDetails => "fetching_details",
            Self::Analyzing => "analyzing",
            Self::GeneratingSummary => "generating_summary",
            Self::PostingComment => "posting_comment",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for states no transition leaves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns whether the state machine allows moving to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if matches!(next, Self::Failed) {
            return true;
        }
        matches!(
            (self, next),
            (Self::Received, Self::Processing)
                | (Self::Processing, Self::FetchingDetails | Self::Analyzing)
                | (Self::FetchingDetails, Self::Analyzing)
                | (Self::Analyzing, Self::GeneratingSummary | Self::PostingComment)
                | (Self::GeneratingSummary, Self::PostingComment)
                | (Self::PostingComment, Self::Completed)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "received" => Ok(Self::Received),
            "processing" => Ok(Self::Processing),
            "fetching_details" => Ok(Self::FetchingDetails),
            "analyzing" => Ok(Self::Analyzing),
            "generating_summary" => Ok(Self::GeneratingSummary),
            "posting_comment" => Ok(Self::PostingComment),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
