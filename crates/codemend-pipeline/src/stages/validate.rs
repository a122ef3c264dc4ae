//! Validation stage

use crate::collab::{ExecStatus, Runner};
use crate::config::PipelineConfig;
use crate::stage::{Stage, StageError};
use async_trait::async_trait;
use codemend_state::{SharedState, TestResults};
use std::path::PathBuf;
use std::sync::Arc;

/// Re-executes the repository's programs through the runner collaborator.
///
/// Target selection: if the apply stage produced sibling "fixed variant"
/// files, only those run; otherwise every file in the scan snapshot runs.
/// This is the only stage that writes `test_results`, and it writes it
/// exactly once, replacing any prior value.
pub struct ValidateStage {
    runner: Arc<dyn Runner>,
    timeout_secs: u64,
}

impl ValidateStage {
    /// Create the stage over a runner collaborator.
    #[must_use]
    pub fn new(runner: Arc<dyn Runner>, config: &PipelineConfig) -> Self {
        Self {
            runner,
            timeout_secs: config.exec_timeout_secs,
        }
    }

    fn targets(state: &SharedState) -> Vec<PathBuf> {
        let variants = state.fixed_variants();
        if variants.is_empty() {
            state.file_contents().keys().cloned().collect()
        } else {
            variants
        }
    }
}

#[async_trait]
impl Stage for ValidateStage {
    fn name(&self) -> &'static str {
        "validate"
    }

    async fn run(&self, state: &mut SharedState) -> Result<(), StageError> {
        let repo = state.repository_path().to_path_buf();
        let targets = Self::targets(state);
        let mut results = TestResults::default();

        for target in &targets {
            match self.runner.execute(target, &repo, self.timeout_secs).await {
                Ok(execution) => match execution.status {
                    ExecStatus::Exited(0) => {
                        tracing::debug!(file = %target.display(), "program passed");
                        results.passed += 1;
                    }
                    ExecStatus::Exited(code) => {
                        results.failed += 1;
                        results.errors.push(format!(
                            "{}: exit code {code}: {}",
                            target.display(),
                            execution.stderr.trim()
                        ));
                    }
                    ExecStatus::TimedOut => {
                        results.failed += 1;
                        results.errors.push(format!(
                            "{}: timed out after {}s",
                            target.display(),
                            self.timeout_secs
                        ));
                    }
                },
                Err(err) => {
                    results.failed += 1;
                    results
                        .errors
                        .push(format!("{}: execution error: {err}", target.display()));
                }
            }
        }

        state.push_message(format!(
            "Validation completed: {} passed, {} failed",
            results.passed, results.failed
        ));
        state.set_test_results(results);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CollabError, Execution, MockRunner};
    use std::path::Path;

    fn exec(status: ExecStatus, stderr: &str) -> Execution {
        Execution {
            status,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    fn stage(runner: MockRunner) -> ValidateStage {
        ValidateStage::new(Arc::new(runner), &PipelineConfig::new().with_exec_timeout(5))
    }

    #[tokio::test]
    async fn counts_passes_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("ok.py", "");
        state.record_file("broken.py", "");

        let mut runner = MockRunner::new();
        runner
            .expect_execute()
            .returning(|path: &Path, _, _| {
                if path.ends_with("ok.py") {
                    Ok(exec(ExecStatus::Exited(0), ""))
                } else {
                    Ok(exec(ExecStatus::Exited(1), "Traceback: boom"))
                }
            });

        stage(runner).run(&mut state).await.unwrap();

        let results = state.test_results().unwrap();
        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 1);
        assert!(results.errors[0].contains("exit code 1"));
        assert!(results.errors[0].contains("Traceback: boom"));
    }

    #[tokio::test]
    async fn prefers_fixed_variants_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("app.py", "");
        state.record_modified_file("app_fixed.py");

        let mut runner = MockRunner::new();
        runner.expect_execute().returning(|path: &Path, _, _| {
            assert!(path.ends_with("app_fixed.py"), "originals must not run");
            Ok(exec(ExecStatus::Exited(0), ""))
        });

        stage(runner).run(&mut state).await.unwrap();

        let results = state.test_results().unwrap();
        assert_eq!(results.passed, 1);
        assert_eq!(results.failed, 0);
    }

    #[tokio::test]
    async fn in_place_rewrites_do_not_shrink_targets() {
        // A file modified in place is still a snapshot key, so all
        // originals run, the rewritten one included.
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("app.py", "");
        state.record_file("lib.py", "");
        state.record_modified_file("app.py");

        let mut runner = MockRunner::new();
        runner
            .expect_execute()
            .times(2)
            .returning(|_, _, _| Ok(exec(ExecStatus::Exited(0), "")));

        stage(runner).run(&mut state).await.unwrap();
        assert_eq!(state.test_results().unwrap().passed, 2);
    }

    #[tokio::test]
    async fn timeout_is_reported_distinctly() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("slow.py", "");

        let mut runner = MockRunner::new();
        runner
            .expect_execute()
            .returning(|_, _, _| Ok(exec(ExecStatus::TimedOut, "")));

        stage(runner).run(&mut state).await.unwrap();

        let results = state.test_results().unwrap();
        assert_eq!(results.failed, 1);
        assert!(results.errors[0].contains("timed out after 5s"));
    }

    #[tokio::test]
    async fn spawn_failure_is_a_per_item_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("app.py", "");

        let mut runner = MockRunner::new();
        runner
            .expect_execute()
            .returning(|_, _, _| Err(CollabError::Failed("interpreter not found".to_string())));

        let outcome = stage(runner).run(&mut state).await;
        assert!(outcome.is_ok());
        assert_eq!(state.test_results().unwrap().failed, 1);
    }

    #[tokio::test]
    async fn empty_repository_validates_vacuously() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();

        let runner = MockRunner::new();
        stage(runner).run(&mut state).await.unwrap();

        let results = state.test_results().unwrap();
        assert_eq!(results.passed, 0);
        assert_eq!(results.failed, 0);
        assert!(results.errors.is_empty());
    }

    #[tokio::test]
    async fn rerun_overwrites_rather_than_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = SharedState::new(dir.path()).unwrap();
        state.record_file("app.py", "");

        let mut runner = MockRunner::new();
        runner
            .expect_execute()
            .returning(|_, _, _| Ok(exec(ExecStatus::Exited(0), "")));

        let stage = stage(runner);
        stage.run(&mut state).await.unwrap();
        stage.run(&mut state).await.unwrap();

        // Two runs, but the counters reflect a single pass over the targets.
        assert_eq!(state.test_results().unwrap().passed, 1);
    }
}
