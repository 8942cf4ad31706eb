//! Pipeline run aggregate root.

use super::{PipelineDomainError, RunId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One recorded status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// State left.
    pub from: TaskStatus,
    /// State entered.
    pub to: TaskStatus,
    /// When the change happened.
    pub at: DateTime<Utc>,
}

/// A single pass of a ticket through the pipeline.
///
/// The status only moves along edges allowed by
/// [`TaskStatus::can_transition_to`]; every accepted change is appended to
/// the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    id: RunId,
    ticket_id: Option<String>,
    status: TaskStatus,
    history: Vec<StatusChange>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PipelineRun {
    /// Starts a run in [`TaskStatus::Received`].
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: RunId::new(),
            ticket_id: None,
            status: TaskStatus::Received,
            history: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn id(&self) -> RunId {
        self.id
    }

    /// Returns the ticket key once the input has been decoded.
    #[must_use]
    pub fn ticket_id(&self) -> Option<&str> {
        self.ticket_id.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns every status change in order.
    #[must_use]
    pub fn history(&self) -> &[StatusChange] {
        &self.history
    }

    /// Returns the visited states, starting with [`TaskStatus::Received`].
    #[must_use]
    pub fn visited(&self) -> Vec<TaskStatus> {
        std::iter::once(TaskStatus::Received)
            .chain(self.history.iter().map(|change| change.to))
            .collect()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the latest change.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the ticket the run is about.
    pub fn assign_ticket(&mut self, ticket_id: impl Into<String>) {
        self.ticket_id = Some(ticket_id.into());
    }

    /// Moves the run to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineDomainError::InvalidTransition`] when the edge is
    /// not allowed; the run is left unchanged.
    pub fn transition_to(
        &mut self,
        next: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), PipelineDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(PipelineDomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        let at = clock.utc();
        self.history.push(StatusChange {
            from: self.status,
            to: next,
            at,
        });
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}
