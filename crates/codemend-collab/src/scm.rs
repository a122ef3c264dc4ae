//! Git synchronization

use async_trait::async_trait;
use codemend_pipeline::{CollabError, Scm};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const SYNC_TIMEOUT_SECS: u64 = 30;

/// Pulls the repository through the `git` binary.
///
/// Ordinary trouble (no remote, non-fast-forward, not a git repository)
/// comes back as warning messages, not errors; only spawn failures and
/// timeouts surface as [`CollabError`].
#[derive(Debug, Clone)]
pub struct GitScm {
    program: String,
    remote: String,
    branch: String,
}

impl GitScm {
    /// Sync against `origin/main`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }

    /// With a different remote and branch.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>, branch: impl Into<String>) -> Self {
        self.remote = remote.into();
        self.branch = branch.into();
        self
    }

    /// Override the executable, for tests.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for GitScm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scm for GitScm {
    async fn sync(&self, repository_path: &Path) -> Result<Vec<String>, CollabError> {
        let child = Command::new(&self.program)
            .arg("pull")
            .arg(&self.remote)
            .arg(&self.branch)
            .current_dir(repository_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(
            Duration::from_secs(SYNC_TIMEOUT_SECS),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| CollabError::Timeout {
            seconds: SYNC_TIMEOUT_SECS,
        })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut messages = Vec::new();
        if output.status.success() {
            messages.push(format!("Pulled {}/{}", self.remote, self.branch));
            for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
                messages.push(line.trim().to_string());
            }
        } else {
            tracing::warn!(stderr = %stderr.trim(), "git pull exited non-zero");
            messages.push(format!(
                "git pull completed with warnings: {}",
                stderr.trim()
            ));
        }

        Ok(messages)
    }
}
