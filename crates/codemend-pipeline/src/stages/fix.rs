//! Fix-generation stage

use crate::collab::Fixer;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::{Fix, Issue, SharedState};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Asks the fixer collaborator for fixes, one file at a time.
///
/// Issues are grouped by file path in first-seen order, so fix proposals
/// come back in a reproducible order for identical inputs. Groups whose
/// file never made it into the scan snapshot are skipped: a fix without
/// cached content to anchor against would be meaningless.
pub struct FixStage {
    fixer: Arc<dyn Fixer>,
}

impl FixStage {
    /// Create the stage over a fixer collaborator.
    #[must_use]
    pub fn new(fixer: Arc<dyn Fixer>) -> Self {
        Self { fixer }
    }
}

/// Group issues by file path, preserving the order paths were first seen.
fn group_by_file(issues: &codemend_state::AppendLog<Issue>) -> IndexMap<PathBuf, Vec<Issue>> {
    let mut groups: IndexMap<PathBuf, Vec<Issue>> = IndexMap::new();
    for issue in issues {
        groups
            .entry(issue.file_path.clone())
            .or_default()
            .push(issue.clone());
    }
    groups
}

#[async_trait]
impl Stage for FixStage {
    fn name(&self) -> &'static str {
        "fix"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let groups = group_by_file(state.issues_found());
        let mut proposed: Vec<Fix> = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        for (path, issues) in &groups {
            let Some(content) = state.file_content(path) else {
                failures.push(format!(
                    "No cached content for {}, skipping fix generation",
                    path.display()
                ));
                continue;
            };

            match self.fixer.generate(path, content, issues).await {
                Ok(fixes) => {
                    tracing::debug!(file = %path.display(), count = fixes.len(), "generated fixes");
                    proposed.extend(fixes.into_iter().map(|mut fix| {
                        // Tag with the group's path; the collaborator does
                        // not get to redirect a fix to another file.
                        fix.file_path = path.clone();
                        fix
                    }));
                }
                Err(err) => {
                    failures.push(format!(
                        "Fix generation failed for {}: {err}",
                        path.display()
                    ));
                }
            }
        }

        let fix_count = proposed.len();
        state.append_fixes(proposed);
        for failure in failures {
            tracing::warn!(%failure, "per-file fix generation failure");
            state.push_message(failure);
        }
        state.push_message(format!("Generated {fix_count} candidate fixes"));

        Ok(())
    }
}
