//! Apply stage

use crate::collab::Fixer;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::{Fix, SharedState};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Applies the proposed fixes to files on disk.
///
/// Fixes are grouped by file path in first-seen order. For each file the
/// stage reads the current on-disk content (not the scan snapshot — the
/// file may have moved on), hands it to the fixer collaborator together
/// with that file's fixes, and writes the result wherever the fixer's
/// output policy points: the original path or a sibling. A fix whose
/// anchor text is gone is skipped silently inside the collaborator and
/// leaves no change-log entry.
///
/// This is the only stage that mutates files on disk, and it writes one
/// file at a time.
pub struct ApplyStage {
    fixer: Arc<dyn Fixer>,
}

impl ApplyStage {
    /// Create the stage over a fixer collaborator.
    #[must_use]
    pub fn new(fixer: Arc<dyn Fixer>) -> Self {
        Self { fixer }
    }
}

/// Group fixes by file path, preserving the order paths were first seen.
fn group_by_file(fixes: &codemend_state::AppendLog<Fix>) -> IndexMap<PathBuf, Vec<Fix>> {
    let mut groups: IndexMap<PathBuf, Vec<Fix>> = IndexMap::new();
    for fix in fixes {
        groups
            .entry(fix.file_path.clone())
            .or_default()
            .push(fix.clone());
    }
    groups
}

#[async_trait]
impl Stage for ApplyStage {
    fn name(&self) -> &'static str {
        "apply"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let groups = group_by_file(state.suggested_fixes());
        let mut modified: Vec<PathBuf> = Vec::new();
        let mut changes: Vec<String> = Vec::new();
        let mut failures: Vec<String> = Vec::new();

        for (path, fixes) in &groups {
            let current = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    failures.push(format!("Could not read {}: {err}", path.display()));
                    continue;
                }
            };

            let (new_content, change_log) = match self.fixer.apply(path, &current, fixes).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    failures.push(format!("Fix application failed for {}: {err}", path.display()));
                    continue;
                }
            };

            if new_content == current {
                // Every fix for this file was stale; nothing to write.
                continue;
            }

            let target = self.fixer.output_path(path);
            if let Err(err) = std::fs::write(&target, &new_content) {
                failures.push(format!("Could not write {}: {err}", target.display()));
                continue;
            }

            tracing::info!(file = %target.display(), applied = change_log.len(), "rewrote file");
            changes.extend(change_log);
            modified.push(target);
        }

        let file_count = modified.len();
        for change in changes {
            state.append_change(change);
        }
        for path in modified {
            state.record_modified_file(path);
        }
        for failure in failures {
            tracing::warn!(%failure, "per-file apply failure");
            state.push_message(failure);
        }
        state.push_message(format!("Applied fixes to {file_count} files"));

        Ok(())
    }
}
