//! Stage abstraction
//!
//! A stage is one unit of sequential pipeline work over the shared state.
//! Stages receive the state by exclusive borrow for the duration of their
//! run; no two stages ever observe it at the same time.

use crate::collab::CollabError;
use async_trait::async_trait;
use codemend_state::SharedState;

/// A failure that escaped a stage's own boundary.
///
/// Recoverable per-item conditions (one unreadable file, one failed
/// analysis call) never become a `StageError`; stages log and skip those.
/// Whatever does escape is caught by the pipeline, recorded, and does not
/// stop the remaining stages.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// A collaborator call failed in a way the stage could not absorb.
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] CollabError),

    /// Filesystem access failed in a way the stage could not absorb.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else unexpected.
    #[error("{0}")]
    Internal(String),
}

/// One unit of sequential pipeline work.
///
/// # Contract
/// - Must append exactly one summary message to `state.messages()`
///   describing what it did, before returning — on the error path too,
///   if the stage gets that far.
/// - Per-item failures are recorded into the state and skipped; only
///   unexpected faults return `Err`.
/// - The pipeline does not deduplicate: re-running a stage appends its
///   summary again.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable stage name, used in logs and error records.
    fn name(&self) -> &'static str;

    /// Execute the stage against the current run state.
    async fn run(&self, state: &mut SharedState) -> Result<(), StageError>;
}
