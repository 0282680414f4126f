//! Execution boundary for model-generated scripts.
//!
//! Callers only see [`CodeExecutor`], so a stricter sandbox can replace
//! [`SubprocessExecutor`] without touching the agents.

mod subprocess;

pub use subprocess::SubprocessExecutor;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Script exited with code 0
    Success,
    /// Script ran but exited non-zero
    Error,
    /// Script could not be written, spawned, or finished in time
    ExecutionFailed,
}

/// Outcome of one script run: stdout on success, stderr or the failure reason otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub output: String,
}

impl ExecutionResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Success,
            output: stdout.into(),
        }
    }

    pub fn error(stderr: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            output: stderr.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::ExecutionFailed,
            output: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ExecutionStatus::Success => write!(f, "SUCCESS:\n{}", self.output),
            ExecutionStatus::Error => write!(f, "ERROR:\n{}", self.output),
            ExecutionStatus::ExecutionFailed => write!(f, "EXECUTION FAILED: {}", self.output),
        }
    }
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run `code` with `working_dir` as its current directory.
    ///
    /// Never fails: every problem is folded into the returned result.
    async fn execute(&self, code: &str, working_dir: &Path, timeout: Duration)
        -> ExecutionResult;
}
