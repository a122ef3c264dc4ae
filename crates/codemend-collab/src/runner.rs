//! Program execution with a wall-clock timeout

use async_trait::async_trait;
use codemend_pipeline::{CollabError, ExecStatus, Execution, Runner};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Executes files through an interpreter, enforcing the timeout itself.
///
/// Expiry is reported as [`ExecStatus::TimedOut`], never as a hung call or
/// a fabricated exit code. The child is killed when the timeout fires.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: String,
}

impl ProcessRunner {
    /// Run files with `python3`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            interpreter: "python3".to_string(),
        }
    }

    /// Run files with a different interpreter.
    #[must_use]
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn execute(
        &self,
        file_path: &Path,
        working_dir: &Path,
        timeout_secs: u64,
    ) -> Result<Execution, CollabError> {
        let child = Command::new(&self.interpreter)
            .arg(file_path)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        match tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
            .await
        {
            Ok(output) => {
                let output = output?;
                // None means the process died to a signal.
                let code = output.status.code().unwrap_or(-1);
                Ok(Execution {
                    status: ExecStatus::Exited(code),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            Err(_) => {
                tracing::warn!(file = %file_path.display(), timeout_secs, "execution timed out");
                Ok(Execution {
                    status: ExecStatus::TimedOut,
                    stdout: String::new(),
                    stderr: String::new(),
                })
            }
        }
    }
}
