use super::Agent;
use crate::engine::Engine;
use crate::error::AgentError;
use crate::executor::ExecutionResult;
use crate::llm::CompletionClient;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str =
    "You are a QA Lead. Evaluate automated data cleaning jobs honestly and concisely.";

/// Grades a cleaning run; score extraction is left to the caller
pub struct Reviewer {
    agent: Agent,
}

impl Reviewer {
    pub fn new(engine: Arc<Engine>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            agent: Agent::new("Reviewer", engine, client),
        }
    }

    pub async fn run(
        &self,
        issues: &str,
        execution: &ExecutionResult,
        code: &str,
    ) -> Result<String, AgentError> {
        self.agent.log("Start", "Evaluating the cleaning process");

        let grade = self
            .agent
            .ask(SYSTEM_PROMPT, build_prompt(issues, execution, code))
            .await?;

        self.agent
            .log("Complete", &format!("Evaluation: {}", grade));
        Ok(grade)
    }
}

fn build_prompt(issues: &str, execution: &ExecutionResult, code: &str) -> String {
    format!(
        "Original issues detected:\n{}\n\n\
        Code executed:\n{}\n\n\
        Execution output:\n{}\n\n\
        Your task:\n\
        1. Did the code run successfully?\n\
        2. Does the code address the original issues?\n\
        3. Assign a Quality Score (0-100).\n\n\
        Output format:\n\
        Provide a brief summary and the final score.",
        issues, code, execution
    )
}
