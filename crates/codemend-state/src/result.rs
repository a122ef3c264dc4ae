//! Final run result
//!
//! [`PipelineResult`] is derived from the final state once all stages have
//! run, and is immutable from then on. Failure is surfaced exclusively
//! through `success == false` plus the populated `errors` list; the
//! pipeline never raises past its own boundary.

use crate::state::SharedState;
use serde::Serialize;

/// Terminal outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// True only when no stage failed and no validated program failed.
    pub success: bool,
    /// One-sentence human summary of the run.
    pub summary: String,
    /// Copy of the human-readable change log.
    pub changes_made: Vec<String>,
    /// Validation errors plus any stage-level errors, in occurrence order.
    pub errors: Vec<String>,
    /// Descriptions of every issue detected.
    pub issues_found: Vec<String>,
}

impl PipelineResult {
    /// Assemble the result from the final state and the stage-level errors
    /// the pipeline accumulated.
    #[must_use]
    pub fn from_state(state: &SharedState, stage_errors: Vec<String>) -> Self {
        let issue_count = state.issues_found().len();
        let change_count = state.applied_changes().len();

        let mut errors: Vec<String> = state
            .test_results()
            .map(|r| r.errors.clone())
            .unwrap_or_default();
        let validation_failed = state.test_results().is_some_and(|r| r.failed > 0);
        let had_stage_errors = !stage_errors.is_empty();
        errors.extend(stage_errors);

        Self {
            success: !had_stage_errors && !validation_failed,
            summary: format!(
                "Run completed. Issues found: {issue_count}, Changes applied: {change_count}"
            ),
            changes_made: state.applied_changes().to_vec(),
            errors,
            issues_found: state
                .issues_found()
                .iter()
                .map(|i| i.description.clone())
                .collect(),
        }
    }

    /// Result for a run that could not even start (fatal setup failure).
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            summary: format!("Run failed: {message}"),
            changes_made: Vec::new(),
            errors: vec![message],
            issues_found: Vec::new(),
        }
    }
}
