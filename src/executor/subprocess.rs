use super::{CodeExecutor, ExecutionResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, warn};
use uuid::Uuid;

/// Writes the script next to the data and runs it with an external interpreter
pub struct SubprocessExecutor {
    pub interpreter: PathBuf,
    pub script_name: String,
    /// Suffix each script with a fresh id so parallel runs never share a file
    pub unique_scripts: bool,
}

impl SubprocessExecutor {
    pub fn new(interpreter: impl Into<PathBuf>, script_name: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_name: script_name.into(),
            unique_scripts: false,
        }
    }

    pub fn with_unique_scripts(mut self, unique: bool) -> Self {
        self.unique_scripts = unique;
        self
    }

    fn script_name_for_run(&self) -> String {
        if !self.unique_scripts {
            return self.script_name.clone();
        }

        let path = Path::new(&self.script_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "script".to_string());
        let id = Uuid::new_v4().simple().to_string();
        match path.extension() {
            Some(ext) => format!("{}_{}.{}", stem, id, ext.to_string_lossy()),
            None => format!("{}_{}", stem, id),
        }
    }
}

#[async_trait]
impl CodeExecutor for SubprocessExecutor {
    fn name(&self) -> &'static str {
        "subprocess"
    }

    async fn execute(
        &self,
        code: &str,
        working_dir: &Path,
        timeout: Duration,
    ) -> ExecutionResult {
        let script_name = self.script_name_for_run();
        let script_path = working_dir.join(&script_name);

        if let Err(e) = tokio::fs::write(&script_path, code).await {
            return ExecutionResult::failed(format!(
                "could not write {}: {}",
                script_path.display(),
                e
            ));
        }

        let result = self.run_script(&script_name, working_dir, timeout).await;

        // Per-run copies are removed; the fixed-name script stays for inspection
        if self.unique_scripts {
            if let Err(e) = tokio::fs::remove_file(&script_path).await {
                debug!("Could not remove {}: {}", script_path.display(), e);
            }
        }
        result
    }
}

impl SubprocessExecutor {
    async fn run_script(
        &self,
        script_name: &str,
        working_dir: &Path,
        timeout: Duration,
    ) -> ExecutionResult {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(script_name)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = std::time::Instant::now();

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult::failed(format!(
                    "could not start {}: {}",
                    self.interpreter.display(),
                    e
                ))
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio_timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return ExecutionResult::failed(e.to_string()),
            Err(_) => {
                warn!("Script {} timed out after {:?}", script_name, timeout);
                return ExecutionResult::failed(format!("timed out after {:?}", timeout));
            }
        };

        debug!(
            "Script {} exited with {:?} in {:?}",
            script_name,
            output.status.code(),
            start.elapsed()
        );

        if output.status.success() {
            ExecutionResult::success(String::from_utf8_lossy(&output.stdout))
        } else {
            ExecutionResult::error(String::from_utf8_lossy(&output.stderr))
        }
    }
}
