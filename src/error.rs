use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("{var} is not set and no terminal is available to prompt for it")]
    Missing { var: String },

    #[error("Credential prompt aborted")]
    Aborted,

    #[error("Empty credential entered")]
    Empty,

    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key is missing: set it in the environment before running agents")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Authentication failed ({code}): {message}")]
    Auth { code: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Failed to parse LLM response: {0}")]
    Parse(String),

    #[error("LLM returned no content")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{agent} failed: {source}")]
    Completion {
        agent: String,
        #[source]
        source: LlmError,
    },
}

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Input directory not found: {0}")]
    MissingInputDir(PathBuf),

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File is empty: {0}")]
    EmptyFile(PathBuf),
}

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to write state file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("State lock poisoned")]
    Poisoned,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that abort processing of a single input file.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Preview(#[from] DiscoveryError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}
