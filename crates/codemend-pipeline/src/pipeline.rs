//! Pipeline engine
//!
//! Owns the ordered stage list and the execution loop. The topology is
//! fixed at construction: no branching, no looping, no retries. What the
//! pipeline does own is failure isolation — an error escaping one stage is
//! recorded and the remaining stages still run against whatever state the
//! failed stage left behind (a stage's partial writes are not rolled back).

use crate::collab::{Analyzer, Fixer, Runner, Scm};
use crate::config::PipelineConfig;
use crate::stage::Stage;
use crate::stages::{AnalyzeStage, ApplyStage, FixStage, ScanStage, SyncStage, ValidateStage};
use codemend_state::{PipelineResult, SharedState};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// An ordered sequence of stages over one shared state.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Build a pipeline from an explicit stage list, executed in order.
    #[must_use]
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Wire the standard six-stage remediation pipeline:
    /// sync, scan, analyze, fix, apply, validate.
    ///
    /// The sync stage is omitted when the configuration disables it.
    #[must_use]
    pub fn standard(
        config: &PipelineConfig,
        scm: Arc<dyn Scm>,
        analyzer: Arc<dyn Analyzer>,
        fixer: Arc<dyn Fixer>,
        runner: Arc<dyn Runner>,
    ) -> Self {
        let mut stages: Vec<Box<dyn Stage>> = Vec::with_capacity(6);
        if config.sync_enabled {
            stages.push(Box::new(SyncStage::new(scm)));
        }
        stages.push(Box::new(ScanStage::new(config)));
        stages.push(Box::new(AnalyzeStage::new(analyzer)));
        stages.push(Box::new(FixStage::new(Arc::clone(&fixer))));
        stages.push(Box::new(ApplyStage::new(fixer)));
        stages.push(Box::new(ValidateStage::new(runner, config)));
        Self::new(stages)
    }

    /// Number of stages in the fixed topology.
    #[inline]
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run every stage in order against the given state and assemble the
    /// result. This never returns an error: failures travel inside the
    /// returned [`PipelineResult`].
    pub async fn run(&self, mut state: SharedState) -> PipelineResult {
        let mut stage_errors: Vec<String> = Vec::new();

        for stage in &self.stages {
            let started = Instant::now();
            match stage.run(&mut state).await {
                Ok(()) => {
                    tracing::info!(
                        stage = stage.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "stage completed"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        stage = stage.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %err,
                        "stage failed, continuing with next stage"
                    );
                    state.push_message(format!("Stage error in {}: {err}", stage.name()));
                    stage_errors.push(format!("{}: {err}", stage.name()));
                }
            }
        }

        PipelineResult::from_state(&state, stage_errors)
    }

    /// Build the initial state for `repository_path` and run.
    ///
    /// A state that cannot be constructed (missing or non-directory path)
    /// short-circuits into an immediate failed result; no stage runs.
    pub async fn run_path(&self, repository_path: impl AsRef<Path>) -> PipelineResult {
        match SharedState::new(repository_path.as_ref()) {
            Ok(state) => self.run(state).await,
            Err(err) => {
                tracing::error!(error = %err, "could not build initial state");
                PipelineResult::failure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageError;
    use async_trait::async_trait;

    struct NamedStage(&'static str);

    #[async_trait]
    impl Stage for NamedStage {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
            state.push_message(format!("{} ran", self.0));
            Ok(())
        }
    }

    struct ExplodingStage;

    #[async_trait]
    impl Stage for ExplodingStage {
        fn name(&self) -> &'static str {
            "exploding"
        }

        async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
            // Partial write before the failure; must survive into the result.
            state.push_message("partial write".to_string());
            Err(StageError::Internal("unexpected fault".to_string()))
        }
    }

    #[tokio::test]
    async fn stages_run_in_construction_order() {
        let pipeline = Pipeline::new(vec![
            Box::new(NamedStage("first")),
            Box::new(NamedStage("second")),
            Box::new(NamedStage("third")),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let result = pipeline.run_path(dir.path()).await;

        assert!(result.success);
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn failed_stage_is_isolated_and_recorded() {
        let pipeline = Pipeline::new(vec![
            Box::new(NamedStage("before")),
            Box::new(ExplodingStage),
            Box::new(NamedStage("after")),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let state = SharedState::new(dir.path()).unwrap();
        let result = pipeline.run(state).await;

        assert!(!result.success);
        assert_eq!(result.errors, vec!["exploding: unexpected fault".to_string()]);
    }

    #[tokio::test]
    async fn messages_grow_at_least_one_per_stage() {
        let pipeline = Pipeline::new(vec![
            Box::new(NamedStage("a")),
            Box::new(ExplodingStage),
            Box::new(NamedStage("b")),
        ]);

        let dir = tempfile::tempdir().unwrap();

        // Run against a state we can observe afterwards through the result:
        // each healthy stage appends one message, the failed stage gets an
        // error record appended by the pipeline itself.
        let state = SharedState::new(dir.path()).unwrap();
        let result = pipeline.run(state).await;
        assert_eq!(result.errors.len(), 1);
    }

    #[tokio::test]
    async fn invalid_path_short_circuits() {
        let pipeline = Pipeline::new(vec![Box::new(NamedStage("never"))]);
        let result = pipeline.run_path("/definitely/not/here").await;

        assert!(!result.success);
        assert!(result.changes_made.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("repository path does not exist"));
    }
}
