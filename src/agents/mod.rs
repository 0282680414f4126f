//! LLM-backed pipeline roles.
//!
//! Each role formats one prompt, makes one completion call, post-processes the
//! text and returns. Completion failures propagate; nothing is retried.

mod analyst;
mod coder;
mod reviewer;

pub use analyst::Analyst;
pub use coder::{build_instruction, Coder, ExecutorSettings};
pub use reviewer::Reviewer;

use crate::engine::Engine;
use crate::error::AgentError;
use crate::llm::{AgentMessage, CompletionClient};
use std::sync::Arc;

/// Shared plumbing for every role: identity, logging and the model call
pub struct Agent {
    name: String,
    engine: Arc<Engine>,
    client: Arc<dyn CompletionClient>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        engine: Arc<Engine>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            name: name.into(),
            engine,
            client,
        }
    }

    pub fn log(&self, action: &str, details: &str) {
        self.engine.log(&self.name, action, details);
    }

    async fn ask(&self, system_prompt: &str, user_prompt: String) -> Result<String, AgentError> {
        let messages = [
            AgentMessage::system(system_prompt),
            AgentMessage::user(user_prompt),
        ];
        self.client
            .complete(&messages)
            .await
            .map_err(|source| AgentError::Completion {
                agent: self.name.clone(),
                source,
            })
    }
}

/// Remove markdown code fences the model wraps scripts in
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```python", "")
        .replace("```py", "")
        .replace("```", "")
        .trim()
        .to_string()
}
