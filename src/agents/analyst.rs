use super::Agent;
use crate::engine::Engine;
use crate::error::AgentError;
use crate::llm::CompletionClient;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a Senior Data Quality Analyst.";

/// Reads a tabular preview and lists data-quality issues
pub struct Analyst {
    agent: Agent,
}

impl Analyst {
    pub fn new(engine: Arc<Engine>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            agent: Agent::new("Analyst", engine, client),
        }
    }

    pub async fn run(&self, csv_preview: &str) -> Result<String, AgentError> {
        self.agent
            .log("Start", "Analyzing CSV structure for quality issues");

        let issues = self.agent.ask(SYSTEM_PROMPT, build_prompt(csv_preview)).await?;

        self.agent.log("Complete", "Analysis finished");
        Ok(issues)
    }
}

fn build_prompt(csv_preview: &str) -> String {
    format!(
        "Here are the first rows of a dataset:\n\n\
        {}\n\n\
        Your task:\n\
        Identify 3-5 critical data quality issues (e.g. missing values, inconsistent \
        date formats, mixed data types, typos, duplicated rows).\n\n\
        Output format:\n\
        Return ONLY a bulleted list of the issues found. Do not write code.",
        csv_preview
    )
}
