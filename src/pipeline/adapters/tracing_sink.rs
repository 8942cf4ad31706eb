//! Status sink that reports through `tracing`.

use async_trait::async_trait;
use tracing::info;

use crate::pipeline::{
    domain::{Artifact, RunId, StatusUpdate},
    ports::{StatusSinkResult, TaskStatusSink},
};

/// Sink that logs every update and artifact at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatusSink;

#[async_trait]
impl TaskStatusSink for TracingStatusSink {
    async fn update_status(&self, run_id: RunId, update: StatusUpdate) -> StatusSinkResult<()> {
        info!(
            run_id = %run_id,
            state = %update.state,
            message = %update.message_text().unwrap_or_default(),
            "run status changed"
        );
        Ok(())
    }

    async fn add_artifact(&self, run_id: RunId, artifact: Artifact) -> StatusSinkResult<()> {
        info!(
            run_id = %run_id,
            artifact = %artifact.name,
            description = %artifact.description,
            "artifact added"
        );
        Ok(())
    }
}
