//! End-to-end pipeline runs against throwaway repositories.

use codemend_collab::{PatternAnalyzer, RuleFixer};
use codemend_pipeline::{Pipeline, PipelineConfig, SharedState};
use codemend_test_utils::{
    fixture_repo, FailingAnalyzer, ScriptedRunner, ScriptedScm, SubstringFixer,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn standard_pipeline(config: &PipelineConfig, runner: Arc<ScriptedRunner>) -> Pipeline {
    Pipeline::standard(
        config,
        Arc::new(ScriptedScm::new(["Already up to date."])),
        Arc::new(PatternAnalyzer::new()),
        Arc::new(RuleFixer::new()),
        runner,
    )
}

#[tokio::test]
async fn insecure_verify_repo_is_detected_fixed_and_validated() {
    let repo = fixture_repo(&[(
        "main.py",
        "import requests\nresp = requests.get(url, verify=False)\nprint(resp)\n",
    )]);
    let config = PipelineConfig::new();
    let runner = Arc::new(ScriptedRunner::new());
    let pipeline = standard_pipeline(&config, Arc::clone(&runner));

    let result = pipeline.run_path(repo.path()).await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.issues_found.len(), 1);
    assert!(result.issues_found[0].contains("TLS certificate verification"));
    assert_eq!(result.changes_made.len(), 1);
    assert!(result.errors.is_empty());

    let rewritten = std::fs::read_to_string(repo.path().join("main.py")).unwrap();
    assert!(rewritten.contains("verify=True"));
    assert!(!rewritten.contains("verify=False"));

    // In-place rewrite: validation runs the original snapshot files.
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn messages_cover_at_least_one_entry_per_stage() {
    use codemend_pipeline::stages::{
        AnalyzeStage, ApplyStage, FixStage, ScanStage, SyncStage, ValidateStage,
    };
    use codemend_pipeline::Stage;

    let repo = fixture_repo(&[("main.py", "print('fine')\n")]);
    let config = PipelineConfig::new();
    let fixer = Arc::new(RuleFixer::new());

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(SyncStage::new(Arc::new(ScriptedScm::new(["up to date"])))),
        Box::new(ScanStage::new(&config)),
        Box::new(AnalyzeStage::new(Arc::new(PatternAnalyzer::new()))),
        Box::new(FixStage::new(Arc::clone(&fixer) as _)),
        Box::new(ApplyStage::new(fixer)),
        Box::new(ValidateStage::new(Arc::new(ScriptedRunner::new()), &config)),
    ];

    let mut state = SharedState::new(repo.path()).unwrap();
    let mut previous_len = 0;
    for stage in &stages {
        stage.run(&mut state).await.unwrap();
        // Every stage appends at least its own summary, and nothing ever
        // removes an earlier entry.
        assert!(state.messages().len() > previous_len, "{}", stage.name());
        previous_len = state.messages().len();
    }

    assert!(state.messages().len() >= stages.len());
}

#[tokio::test]
async fn analyzer_failure_is_contained_in_the_result() {
    let repo = fixture_repo(&[("main.py", "print('x')\n")]);
    let config = PipelineConfig::new().without_sync();

    // Per-file analyzer failures are absorbed by the stage; the run still
    // produces a result and stays green because validation passes.
    let pipeline = Pipeline::standard(
        &config,
        Arc::new(ScriptedScm::new(Vec::<String>::new())),
        Arc::new(FailingAnalyzer),
        Arc::new(RuleFixer::new()),
        Arc::new(ScriptedRunner::new()),
    );

    let result = pipeline.run_path(repo.path()).await;
    assert!(result.issues_found.is_empty());
    assert!(result.changes_made.is_empty());
    assert!(result.success);
}

#[tokio::test]
async fn empty_repository_succeeds_vacuously() {
    let repo = fixture_repo(&[]);
    let config = PipelineConfig::new();
    let runner = Arc::new(ScriptedRunner::new());
    let pipeline = standard_pipeline(&config, Arc::clone(&runner));

    let result = pipeline.run_path(repo.path()).await;

    assert!(result.success);
    assert!(result.issues_found.is_empty());
    assert!(result.changes_made.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn failing_validation_fails_the_run() {
    let repo = fixture_repo(&[("main.py", "raise SystemExit(2)\n")]);
    let config = PipelineConfig::new();
    let runner = Arc::new(ScriptedRunner::new().with_exit_code("main.py", 2));
    let pipeline = standard_pipeline(&config, runner);

    let result = pipeline.run_path(repo.path()).await;

    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("exit code 2"));
}

#[tokio::test]
async fn scripted_fixer_round_trip_with_custom_suggestions() {
    let repo = fixture_repo(&[("tool.py", "value = legacy_call()\n")]);
    let config = PipelineConfig::new().without_sync();

    let analyzer = codemend_test_utils::ScriptedAnalyzer::new().with_issues(
        "tool.py",
        vec![codemend_pipeline::Issue::new(
            "placeholder",
            "legacy_call is gone",
            codemend_pipeline::Severity::Medium,
        )
        .with_suggestion("legacy_call()=>modern_call()")],
    );

    let pipeline = Pipeline::standard(
        &config,
        Arc::new(ScriptedScm::new(Vec::<String>::new())),
        Arc::new(analyzer),
        Arc::new(SubstringFixer),
        Arc::new(ScriptedRunner::new()),
    );

    let result = pipeline.run_path(repo.path()).await;

    assert!(result.success, "errors: {:?}", result.errors);
    assert_eq!(result.changes_made.len(), 1);
    let rewritten = std::fs::read_to_string(repo.path().join("tool.py")).unwrap();
    assert_eq!(rewritten, "value = modern_call()\n");
}

#[tokio::test]
async fn sibling_output_policy_validates_only_fixed_variants() {
    let repo = fixture_repo(&[
        ("app.py", "requests.get(url, verify=False)\n"),
        ("clean.py", "print('nothing to do')\n"),
    ]);
    let config = PipelineConfig::new().without_sync();
    let runner = Arc::new(ScriptedRunner::new());

    let pipeline = Pipeline::standard(
        &config,
        Arc::new(ScriptedScm::new(Vec::<String>::new())),
        Arc::new(PatternAnalyzer::new()),
        Arc::new(RuleFixer::with_sibling_output("_fixed")),
        Arc::clone(&runner) as _,
    );

    let result = pipeline.run_path(repo.path()).await;

    assert!(result.success, "errors: {:?}", result.errors);
    // The original is untouched, the sibling carries the fix.
    let original = std::fs::read_to_string(repo.path().join("app.py")).unwrap();
    assert!(original.contains("verify=False"));
    let sibling = std::fs::read_to_string(repo.path().join("app_fixed.py")).unwrap();
    assert!(sibling.contains("verify=True"));

    // Only the fixed variant executes, not the two originals.
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn stage_fault_is_recorded_without_crashing_the_run() {
    use codemend_pipeline::stages::{ScanStage, ValidateStage};
    use codemend_pipeline::{Stage, StageError};

    struct FaultyStage;

    #[async_trait::async_trait]
    impl Stage for FaultyStage {
        fn name(&self) -> &'static str {
            "faulty-analyze"
        }

        async fn run(
            &self,
            _state: &mut codemend_pipeline::SharedState,
        ) -> Result<(), StageError> {
            Err(StageError::Internal("analysis backend unreachable".to_string()))
        }
    }

    let repo = fixture_repo(&[("main.py", "print('x')\n")]);
    let config = PipelineConfig::new();
    let pipeline = Pipeline::new(vec![
        Box::new(ScanStage::new(&config)),
        Box::new(FaultyStage),
        Box::new(ValidateStage::new(Arc::new(ScriptedRunner::new()), &config)),
    ]);

    let result = pipeline.run_path(repo.path()).await;

    // The faulted stage is skipped, the validation stage still ran, and the
    // fault text is preserved in the result.
    assert!(!result.success);
    assert_eq!(
        result.errors,
        vec!["faulty-analyze: analysis backend unreachable".to_string()]
    );
}

#[tokio::test]
async fn nonexistent_repository_short_circuits() {
    let config = PipelineConfig::new();
    let pipeline = standard_pipeline(&config, Arc::new(ScriptedRunner::new()));

    let result = pipeline.run_path("/definitely/not/a/repo").await;

    assert!(!result.success);
    assert!(result.changes_made.is_empty());
    assert!(result.errors[0].contains("repository path does not exist"));
}
