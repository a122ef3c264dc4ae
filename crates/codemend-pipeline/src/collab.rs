//! Collaborator boundary traits
//!
//! Everything the pipeline cannot do by itself is consumed through one of
//! these narrow traits: version-control sync, issue detection, fix
//! generation/application and program execution. A collaborator call is a
//! blocking suspension point from the pipeline's perspective; the next
//! stage only runs once it has returned.

use async_trait::async_trait;
use codemend_state::{Fix, Issue};
use std::path::{Path, PathBuf};

/// Errors a collaborator may surface to a stage.
///
/// A collaborator error never aborts the run by itself; the consuming stage
/// decides whether it is a per-item skip or a stage-level failure.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    /// Underlying I/O failure (spawn, read, write).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A collaborator call exceeded its wall-clock budget.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The collaborator produced a response the stage cannot interpret.
    #[error("malformed collaborator response: {0}")]
    Malformed(String),

    /// The collaborator reported an outright failure.
    #[error("{0}")]
    Failed(String),
}

/// Version-control synchronization.
///
/// Must not error for ordinary no-op or non-fast-forward conditions; those
/// come back as status messages instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Scm: Send + Sync {
    /// Bring the repository up to date, returning status messages.
    async fn sync(&self, repository_path: &Path) -> Result<Vec<String>, CollabError>;
}

/// Issue detection over a single file.
///
/// Pure with respect to its inputs: same path and content yield the same
/// issues, and the inputs are never mutated. No findings is `Ok(vec![])`,
/// not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Detect issues in one file's content.
    async fn analyze(&self, file_path: &Path, content: &str) -> Result<Vec<Issue>, CollabError>;
}

/// Fix generation and application for a single file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fixer: Send + Sync {
    /// Propose fixes for the given issues against the cached content.
    async fn generate(
        &self,
        file_path: &Path,
        content: &str,
        issues: &[Issue],
    ) -> Result<Vec<Fix>, CollabError>;

    /// Apply fixes to the current content, returning the new content and a
    /// change-log entry for each fix that actually applied. A `Replace` fix
    /// whose original snippet is no longer present is skipped silently.
    async fn apply(
        &self,
        file_path: &Path,
        content: &str,
        fixes: &[Fix],
    ) -> Result<(String, Vec<String>), CollabError>;

    /// Where the rewritten content should land: the source path itself
    /// (overwrite in place) or a sibling path of the fixer's choosing.
    fn output_path(&self, source: &Path) -> PathBuf {
        source.to_path_buf()
    }
}

/// Outcome status of one program execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    /// The process ran to completion with this exit code.
    Exited(i32),
    /// The process was killed after exceeding the wall-clock budget.
    /// Distinct from a non-zero exit on purpose.
    TimedOut,
}

/// Captured output of one program execution.
#[derive(Debug, Clone)]
pub struct Execution {
    /// How the process ended.
    pub status: ExecStatus,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl Execution {
    /// Whether the program exited cleanly.
    #[inline]
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == ExecStatus::Exited(0)
    }
}

/// Program execution for validation.
///
/// Implementations must enforce `timeout_secs` themselves and report expiry
/// as [`ExecStatus::TimedOut`], never as a hung call or an ordinary exit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runner: Send + Sync {
    /// Execute one file as a program within the given working directory.
    async fn execute(
        &self,
        file_path: &Path,
        working_dir: &Path,
        timeout_secs: u64,
    ) -> Result<Execution, CollabError>;
}
