//! In-process fakes for the completion client and the executor.

use crate::engine::Engine;
use crate::error::LlmError;
use crate::executor::{CodeExecutor, ExecutionResult};
use crate::llm::{AgentMessage, CompletionClient};
use crate::state::StateStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

type Responder = dyn Fn(&[AgentMessage]) -> Result<String, LlmError> + Send + Sync;

pub fn test_engine() -> (TempDir, Arc<Engine>) {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(StateStore::new(dir.path().join("state/session.json")), None);
    (dir, Arc::new(engine))
}

pub struct ScriptedClient {
    responder: Box<Responder>,
    calls: Mutex<Vec<Vec<AgentMessage>>>,
}

impl ScriptedClient {
    pub fn with<F>(responder: F) -> Self
    where
        F: Fn(&[AgentMessage]) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(text: &'static str) -> Self {
        Self::with(move |_| Ok(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(|_| Err(LlmError::RequestFailed("connection refused".to_string())))
    }

    /// Answer according to which role's system prompt opens the conversation
    pub fn by_role(analyst: &'static str, coder: &'static str, reviewer: &'static str) -> Self {
        Self::with(move |messages| Ok(role_reply(messages, analyst, coder, reviewer).to_string()))
    }

    pub fn calls(&self) -> Vec<Vec<AgentMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn role_reply<'a>(
    messages: &[AgentMessage],
    analyst: &'a str,
    coder: &'a str,
    reviewer: &'a str,
) -> &'a str {
    let system = &messages[0].content;
    if system.contains("Analyst") {
        analyst
    } else if system.contains("Engineer") {
        coder
    } else {
        reviewer
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[AgentMessage]) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        (self.responder)(messages)
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorRun {
    pub code: String,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

pub struct StubExecutor {
    result: ExecutionResult,
    runs: Mutex<Vec<ExecutorRun>>,
}

impl StubExecutor {
    pub fn new(result: ExecutionResult) -> Self {
        Self {
            result,
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<ExecutorRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for StubExecutor {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn execute(
        &self,
        code: &str,
        working_dir: &Path,
        timeout: Duration,
    ) -> ExecutionResult {
        self.runs.lock().unwrap().push(ExecutorRun {
            code: code.to_string(),
            working_dir: working_dir.to_path_buf(),
            timeout,
        });
        self.result.clone()
    }
}
