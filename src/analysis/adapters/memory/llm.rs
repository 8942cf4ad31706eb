//! Scripted LLM client for tests and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::analysis::ports::{CompletionRequest, LlmClient, LlmError, LlmResult};

/// LLM client that replays queued responses in order.
///
/// Requests are recorded for inspection. An exhausted script answers with
/// [`LlmError::Rejected`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedLlmClient {
    state: Arc<RwLock<ScriptState>>,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<LlmResult<String>>,
    requests: Vec<CompletionRequest>,
}

impl ScriptedLlmClient {
    /// Creates a client with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that answers once with `response`.
    #[must_use]
    pub fn replying(response: impl Into<String>) -> Self {
        Self::new().with_response(response)
    }

    /// Queues a successful response.
    #[must_use]
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_failure(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    /// Delays every answer, for exercising caller deadlines.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns every request received so far.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Unavailable`] when the lock is poisoned.
    pub fn requests(&self) -> LlmResult<Vec<CompletionRequest>> {
        let state = self
            .state
            .read()
            .map_err(|err| LlmError::unavailable(std::io::Error::other(err.to_string())))?;
        Ok(state.requests.clone())
    }

    fn push(&self, response: LlmResult<String>) {
        if let Ok(mut state) = self.state.write() {
            state.responses.push_back(response);
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: CompletionRequest) -> LlmResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self
            .state
            .write()
            .map_err(|err| LlmError::unavailable(std::io::Error::other(err.to_string())))?;
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Rejected("script exhausted".to_owned())))
    }
}
