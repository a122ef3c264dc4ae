//! Testing utilities for the codemend workspace
//!
//! Shared fixtures and scripted collaborator doubles used by integration
//! tests across crates.

#![allow(missing_docs)]

use async_trait::async_trait;
use codemend_pipeline::{
    Analyzer, CollabError, ExecStatus, Execution, Fixer, Runner, Scm,
};
use codemend_state::{Fix, Issue};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Build a throwaway repository containing the given (relative path,
/// content) pairs. Parent directories are created as needed.
pub fn fixture_repo(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture file");
    }
    dir
}

/// SCM double that returns a fixed message list.
pub struct ScriptedScm {
    pub messages: Vec<String>,
}

impl ScriptedScm {
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(messages: I) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Scm for ScriptedScm {
    async fn sync(&self, _repository_path: &Path) -> Result<Vec<String>, CollabError> {
        Ok(self.messages.clone())
    }
}

/// SCM double that always fails.
pub struct FailingScm;

#[async_trait]
impl Scm for FailingScm {
    async fn sync(&self, _repository_path: &Path) -> Result<Vec<String>, CollabError> {
        Err(CollabError::Failed("scripted scm failure".to_string()))
    }
}

/// Analyzer double returning canned issues per file name.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    by_file: HashMap<String, Vec<Issue>>,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report these issues whenever a path ending in `file_name` is analyzed.
    pub fn with_issues(mut self, file_name: &str, issues: Vec<Issue>) -> Self {
        self.by_file.insert(file_name.to_string(), issues);
        self
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, file_path: &Path, _content: &str) -> Result<Vec<Issue>, CollabError> {
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let mut issues = self.by_file.get(name).cloned().unwrap_or_default();
        for issue in &mut issues {
            issue.file_path = file_path.to_path_buf();
        }
        Ok(issues)
    }
}

/// Analyzer double that always fails, for stage-isolation tests.
pub struct FailingAnalyzer;

#[async_trait]
impl Analyzer for FailingAnalyzer {
    async fn analyze(&self, _file_path: &Path, _content: &str) -> Result<Vec<Issue>, CollabError> {
        Err(CollabError::Failed("scripted analyzer failure".to_string()))
    }
}

/// Fixer double that turns each issue's suggestion into a replace fix and
/// applies replace fixes by plain substring substitution.
pub struct SubstringFixer;

#[async_trait]
impl Fixer for SubstringFixer {
    async fn generate(
        &self,
        file_path: &Path,
        content: &str,
        issues: &[Issue],
    ) -> Result<Vec<Fix>, CollabError> {
        // Suggestions are scripted as "original=>fixed".
        let mut fixes = Vec::new();
        for issue in issues {
            let Some(suggestion) = &issue.suggested_fix else {
                continue;
            };
            let Some((original, fixed)) = suggestion.split_once("=>") else {
                continue;
            };
            if content.contains(original) {
                fixes.push(Fix::replace(file_path, original, fixed, &issue.description));
            }
        }
        Ok(fixes)
    }

    async fn apply(
        &self,
        file_path: &Path,
        content: &str,
        fixes: &[Fix],
    ) -> Result<(String, Vec<String>), CollabError> {
        let mut current = content.to_string();
        let mut log = Vec::new();
        for fix in fixes {
            if let (Some(original), Some(fixed)) = (&fix.original_code, &fix.fixed_code) {
                if current.contains(original.as_str()) {
                    current = current.replace(original.as_str(), fixed);
                    log.push(format!("Fixed {} in {}", fix.explanation, file_path.display()));
                }
            }
        }
        Ok((current, log))
    }
}

/// Runner double scripting exit codes per file name; unknown files pass.
#[derive(Default)]
pub struct ScriptedRunner {
    exit_codes: HashMap<String, i32>,
    calls: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_code(mut self, file_name: &str, code: i32) -> Self {
        self.exit_codes.insert(file_name.to_string(), code);
        self
    }

    /// How many executions were requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Runner for ScriptedRunner {
    async fn execute(
        &self,
        file_path: &Path,
        _working_dir: &Path,
        _timeout_secs: u64,
    ) -> Result<Execution, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let code = self.exit_codes.get(name).copied().unwrap_or(0);
        Ok(Execution {
            status: ExecStatus::Exited(code),
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("scripted failure for {name}")
            },
        })
    }
}

/// Convenience: absolute path of a fixture file.
pub fn fixture_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}
