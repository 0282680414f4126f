use super::{strip_code_fences, Agent};
use crate::engine::Engine;
use crate::error::AgentError;
use crate::executor::{CodeExecutor, ExecutionResult};
use crate::llm::CompletionClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const SYSTEM_PROMPT: &str = "You are an Expert Python Data Engineer.";

/// Where and how long generated scripts run
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

/// Writes a cleaning script for the reported issues and runs it
pub struct Coder {
    agent: Agent,
    executor: Arc<dyn CodeExecutor>,
    settings: ExecutorSettings,
}

impl Coder {
    pub fn new(
        engine: Arc<Engine>,
        client: Arc<dyn CompletionClient>,
        executor: Arc<dyn CodeExecutor>,
        settings: ExecutorSettings,
    ) -> Self {
        Self {
            agent: Agent::new("Coder", engine, client),
            executor,
            settings,
        }
    }

    /// Returns the execution outcome together with the source that produced it
    pub async fn run(
        &self,
        issues: &str,
        instruction: &str,
    ) -> Result<(ExecutionResult, String), AgentError> {
        self.agent
            .log("Start", "Generating cleaning code based on analysis");

        let raw = self
            .agent
            .ask(SYSTEM_PROMPT, build_prompt(issues, instruction))
            .await?;
        let code = strip_code_fences(&raw);

        self.agent.log(
            "Action",
            &format!("Executing generated code via {}", self.executor.name()),
        );
        let result = self
            .executor
            .execute(&code, &self.settings.working_dir, self.settings.timeout)
            .await;

        let outcome = if result.is_success() { "succeeded" } else { "failed" };
        self.agent
            .log("Result", &format!("Code execution {}", outcome));
        Ok((result, code))
    }
}

/// The task line embedded in the coder prompt
pub fn build_instruction(input: &Path, output: &Path) -> String {
    format!(
        "Load '{}'. Fix issues. Save strictly to '{}'. Use index=False.",
        forward_slashes(input),
        forward_slashes(output)
    )
}

fn forward_slashes(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn build_prompt(issues: &str, instruction: &str) -> String {
    format!(
        "Task: {}\n\n\
        Issues to fix:\n{}\n\n\
        Write a complete, executable Python script using the 'pandas' library to fix these issues.\n\n\
        Constraints:\n\
        1. Load the input file named in the task.\n\
        2. Fix the issues listed above.\n\
        3. Save the cleaned dataframe exactly to the output path named in the task, without the index.\n\
        4. Print the message \"Done\" at the end of the script.\n\
        5. Handle potential errors using try/except blocks.\n\
        6. Return ONLY the python code. No explanations.",
        instruction, issues
    )
}
