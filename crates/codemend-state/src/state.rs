//! The shared run state
//!
//! [`SharedState`] is created once per run, moved through the stages by
//! exclusive ownership and discarded once the result has been assembled.
//! Exactly one stage writes to it at any instant; there is no locking
//! because there is no concurrent access.

use crate::error::StateError;
use crate::fix::Fix;
use crate::issue::Issue;
use crate::log::AppendLog;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of the validation stage's program executions.
///
/// Written exactly once per run, by the validation stage; a second write
/// replaces the first rather than accumulating into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestResults {
    /// Programs that exited successfully.
    pub passed: usize,
    /// Programs that failed, timed out, or could not be started.
    pub failed: usize,
    /// Stderr text and execution errors collected from failed programs.
    pub errors: Vec<String>,
}

/// The single mutable record threaded through one pipeline run.
///
/// Field access is mediated so the structural invariants hold by
/// construction: the repository path never changes after [`SharedState::new`],
/// the log fields only grow, and `test_results` is a plain overwrite slot.
#[derive(Debug, Clone, Serialize)]
pub struct SharedState {
    repository_path: PathBuf,
    file_contents: IndexMap<PathBuf, String>,
    issues_found: AppendLog<Issue>,
    suggested_fixes: AppendLog<Fix>,
    applied_changes: AppendLog<String>,
    modified_files: AppendLog<PathBuf>,
    test_results: Option<TestResults>,
    messages: AppendLog<String>,
}

impl SharedState {
    /// Build the initial state for a run.
    ///
    /// # Errors
    /// Returns [`StateError`] if the repository path does not exist or is
    /// not a directory. This is the only fatal failure a run can have.
    pub fn new(repository_path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let repository_path = repository_path.into();
        if !repository_path.exists() {
            return Err(StateError::RepositoryNotFound(repository_path));
        }
        if !repository_path.is_dir() {
            return Err(StateError::NotADirectory(repository_path));
        }
        Ok(Self {
            repository_path,
            file_contents: IndexMap::new(),
            issues_found: AppendLog::new(),
            suggested_fixes: AppendLog::new(),
            applied_changes: AppendLog::new(),
            modified_files: AppendLog::new(),
            test_results: None,
            messages: AppendLog::new(),
        })
    }

    /// Root directory under analysis. Immutable after construction.
    #[inline]
    #[must_use]
    pub fn repository_path(&self) -> &Path {
        &self.repository_path
    }

    /// Record one file's content in the scan snapshot.
    ///
    /// Re-recording a path replaces its snapshot content; keys stay unique.
    pub fn record_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.file_contents.insert(path.into(), content.into());
    }

    /// Scan snapshot, in the order files were recorded.
    #[inline]
    #[must_use]
    pub fn file_contents(&self) -> &IndexMap<PathBuf, String> {
        &self.file_contents
    }

    /// Snapshot content for one path, if it was scanned.
    #[must_use]
    pub fn file_content(&self, path: &Path) -> Option<&str> {
        self.file_contents.get(path).map(String::as_str)
    }

    /// Append one detected issue.
    #[inline]
    pub fn append_issue(&mut self, issue: Issue) {
        self.issues_found.append(issue);
    }

    /// Append a batch of detected issues, preserving their order.
    pub fn append_issues<I: IntoIterator<Item = Issue>>(&mut self, issues: I) {
        self.issues_found.extend_from(issues);
    }

    /// Issues detected so far, in detection order.
    #[inline]
    #[must_use]
    pub fn issues_found(&self) -> &AppendLog<Issue> {
        &self.issues_found
    }

    /// Append one proposed fix.
    #[inline]
    pub fn append_fix(&mut self, fix: Fix) {
        self.suggested_fixes.append(fix);
    }

    /// Append a batch of proposed fixes, preserving their order.
    pub fn append_fixes<I: IntoIterator<Item = Fix>>(&mut self, fixes: I) {
        self.suggested_fixes.extend_from(fixes);
    }

    /// Fixes proposed so far, in proposal order.
    #[inline]
    #[must_use]
    pub fn suggested_fixes(&self) -> &AppendLog<Fix> {
        &self.suggested_fixes
    }

    /// Record one applied change in the human-readable change log.
    #[inline]
    pub fn append_change(&mut self, change: impl Into<String>) {
        self.applied_changes.append(change.into());
    }

    /// Human-readable change log.
    #[inline]
    #[must_use]
    pub fn applied_changes(&self) -> &AppendLog<String> {
        &self.applied_changes
    }

    /// Record a path that was actually written to disk by the apply stage.
    #[inline]
    pub fn record_modified_file(&mut self, path: impl Into<PathBuf>) {
        self.modified_files.append(path.into());
    }

    /// Paths written to disk during this run, in write order.
    #[inline]
    #[must_use]
    pub fn modified_files(&self) -> &AppendLog<PathBuf> {
        &self.modified_files
    }

    /// Paths written during this run that were not part of the scan
    /// snapshot, i.e. sibling "fixed variant" files.
    #[must_use]
    pub fn fixed_variants(&self) -> Vec<PathBuf> {
        self.modified_files
            .iter()
            .filter(|p| !self.file_contents.contains_key(*p))
            .cloned()
            .collect()
    }

    /// Overwrite the validation results. Only the validation stage calls
    /// this, exactly once per run.
    #[inline]
    pub fn set_test_results(&mut self, results: TestResults) {
        self.test_results = Some(results);
    }

    /// Validation results, once the validation stage has run.
    #[inline]
    #[must_use]
    pub fn test_results(&self) -> Option<&TestResults> {
        self.test_results.as_ref()
    }

    /// Append one diagnostic message.
    #[inline]
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.append(message.into());
    }

    /// Diagnostic trail, one entry per noteworthy event.
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &AppendLog<String> {
        &self.messages
    }
}
