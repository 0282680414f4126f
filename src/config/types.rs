use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Directory scanned for `*.csv` inputs
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory the generated scripts write `clean_<name>` files into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,

    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Data rows shown to the analyst
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Files processed in parallel (1 = strictly sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            request_timeout_sec: default_request_timeout_sec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExecutorConfig {
    /// Interpreter used to run generated scripts
    #[serde(default = "default_interpreter")]
    pub interpreter: PathBuf,

    #[serde(default = "default_script_name")]
    pub script_name: String,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    /// Current directory of the spawned script
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            script_name: default_script_name(),
            timeout_sec: default_timeout_sec(),
            working_dir: default_working_dir(),
        }
    }
}
