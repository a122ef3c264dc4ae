//! Synchronization stage

use crate::collab::Scm;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::SharedState;
use std::sync::Arc;

/// Brings the repository up to date through the SCM collaborator.
///
/// Touches nothing but the message trail. A failing sync is a warning, not
/// an error: an out-of-date working copy is still analyzable.
pub struct SyncStage {
    scm: Arc<dyn Scm>,
}

impl SyncStage {
    /// Create the stage over an SCM collaborator.
    #[must_use]
    pub fn new(scm: Arc<dyn Scm>) -> Self {
        Self { scm }
    }
}

#[async_trait]
impl Stage for SyncStage {
    fn name(&self) -> &'static str {
        "sync"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let repo = state.repository_path().to_path_buf();

        match self.scm.sync(&repo).await {
            Ok(status_messages) => {
                let count = status_messages.len();
                for message in status_messages {
                    state.push_message(message);
                }
                state.push_message(format!(
                    "Synchronized repository ({count} status messages)"
                ));
            }
            Err(err) => {
                tracing::warn!(error = %err, "repository sync failed, continuing");
                state.push_message(format!("Sync skipped: {err}"));
            }
        }

        Ok(())
    }
}
