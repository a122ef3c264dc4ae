//! Scan stage

use crate::config::PipelineConfig;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::SharedState;
use std::path::Path;
use walkdir::WalkDir;

/// Snapshots the repository's source files into the shared state.
///
/// Traversal is depth-first with directory entries sorted by file name, so
/// two scans of the same tree populate the snapshot in the same order.
/// A file that cannot be read is logged and skipped; the scan never aborts
/// on a single bad file.
pub struct ScanStage {
    extensions: Vec<String>,
    max_file_bytes: u64,
}

impl ScanStage {
    /// Create the stage from the run configuration.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            extensions: config.source_extensions.clone(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}

/// Directories that never contain project sources.
fn is_hidden_or_vendored(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "__pycache__" || name == "node_modules")
        .unwrap_or(false)
}

#[async_trait]
impl Stage for ScanStage {
    fn name(&self) -> &'static str {
        "scan"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let root = state.repository_path().to_path_buf();
        let mut scanned = 0usize;
        let mut skipped: Vec<String> = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden_or_vendored(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    skipped.push(format!("Skipped unreadable entry: {err}"));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.wants(entry.path()) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                if meta.len() > self.max_file_bytes {
                    skipped.push(format!(
                        "Skipped {} ({} bytes exceeds scan limit)",
                        entry.path().display(),
                        meta.len()
                    ));
                    continue;
                }
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => {
                    state.record_file(entry.path(), content);
                    scanned += 1;
                }
                Err(err) => {
                    skipped.push(format!("Skipped {}: {err}", entry.path().display()));
                }
            }
        }

        for message in skipped {
            tracing::debug!(%message, "scan skipped an entry");
            state.push_message(message);
        }
        state.push_message(format!("Scanned {scanned} source files"));

        Ok(())
    }
}
