//! Status sink that records everything it receives.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::pipeline::{
    domain::{Artifact, RunId, StatusUpdate, TaskStatus},
    ports::{StatusSinkError, StatusSinkResult, TaskStatusSink},
};

/// In-memory sink keeping updates and artifacts in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusSink {
    state: Arc<RwLock<RecordedState>>,
}

#[derive(Debug, Default)]
struct RecordedState {
    updates: Vec<(RunId, StatusUpdate)>,
    artifacts: Vec<(RunId, Artifact)>,
}

impl RecordingStatusSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the updates recorded for a run.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSinkError::Unavailable`] when the lock is poisoned.
    pub fn updates(&self, run_id: RunId) -> StatusSinkResult<Vec<StatusUpdate>> {
        let state = self.read()?;
        Ok(state
            .updates
            .iter()
            .filter(|(id, _)| *id == run_id)
            .map(|(_, update)| update.clone())
            .collect())
    }

    /// Returns the states reported for a run, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSinkError::Unavailable`] when the lock is poisoned.
    pub fn states(&self, run_id: RunId) -> StatusSinkResult<Vec<TaskStatus>> {
        Ok(self
            .updates(run_id)?
            .into_iter()
            .map(|update| update.state)
            .collect())
    }

    /// Returns the artifacts attached to a run.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSinkError::Unavailable`] when the lock is poisoned.
    pub fn artifacts(&self, run_id: RunId) -> StatusSinkResult<Vec<Artifact>> {
        let state = self.read()?;
        Ok(state
            .artifacts
            .iter()
            .filter(|(id, _)| *id == run_id)
            .map(|(_, artifact)| artifact.clone())
            .collect())
    }

    fn read(&self) -> StatusSinkResult<std::sync::RwLockReadGuard<'_, RecordedState>> {
        self.state
            .read()
            .map_err(|err| StatusSinkError::unavailable(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskStatusSink for RecordingStatusSink {
    async fn update_status(&self, run_id: RunId, update: StatusUpdate) -> StatusSinkResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StatusSinkError::unavailable(std::io::Error::other(err.to_string())))?;
        state.updates.push((run_id, update));
        Ok(())
    }

    async fn add_artifact(&self, run_id: RunId, artifact: Artifact) -> StatusSinkResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StatusSinkError::unavailable(std::io::Error::other(err.to_string())))?;
        state.artifacts.push((run_id, artifact));
        Ok(())
    }
}
