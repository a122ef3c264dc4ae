//! Analysis stage

use crate::collab::Analyzer;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::{Issue, SharedState};
use std::sync::Arc;

/// Runs the analyzer collaborator over every scanned file.
///
/// Files are analyzed in snapshot order and the findings concatenated in
/// that same order, so identical inputs produce identical issue sequences.
/// One file's analyzer failure does not block the remaining files.
pub struct AnalyzeStage {
    analyzer: Arc<dyn Analyzer>,
}

impl AnalyzeStage {
    /// Create the stage over an analyzer collaborator.
    #[must_use]
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Stage for AnalyzeStage {
    fn name(&self) -> &'static str {
        "analyze"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let mut found: Vec<Issue> = Vec::new();
        let mut failures: Vec<String> = Vec::new();
        let file_count = state.file_contents().len();

        for (path, content) in state.file_contents() {
            match self.analyzer.analyze(path, content).await {
                Ok(issues) => {
                    tracing::debug!(file = %path.display(), count = issues.len(), "analyzed file");
                    found.extend(issues);
                }
                Err(err) => {
                    failures.push(format!("Analysis failed for {}: {err}", path.display()));
                }
            }
        }

        let issue_count = found.len();
        state.append_issues(found);
        for failure in failures {
            tracing::warn!(%failure, "per-file analysis failure");
            state.push_message(failure);
        }
        state.push_message(format!(
            "Analysis found {issue_count} issues across {file_count} files"
        ));

        Ok(())
    }
}
