use clap::{value_parser, Arg, ArgAction, Command};
use codemend_collab::{GitScm, PatternAnalyzer, ProcessRunner, RuleFixer};
use codemend_pipeline::{Pipeline, PipelineConfig};
use codemend_state::PipelineResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Command::new("codemend")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan a repository, fix deprecation and compatibility issues, re-run it")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Run the full remediation pipeline against a repository")
                .arg(
                    Arg::new("repo")
                        .long("repo")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Repository root to analyze"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .default_value("30")
                        .value_parser(value_parser!(u64))
                        .help("Wall-clock seconds allowed per validated program"),
                )
                .arg(
                    Arg::new("ext")
                        .long("ext")
                        .action(ArgAction::Append)
                        .default_values(["py"])
                        .help("Source file extension to scan (repeatable)"),
                )
                .arg(
                    Arg::new("interpreter")
                        .long("interpreter")
                        .default_value("python3")
                        .help("Interpreter used to execute programs during validation"),
                )
                .arg(
                    Arg::new("remote")
                        .long("remote")
                        .default_value("origin")
                        .help("Git remote to pull before analysis"),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .default_value("main")
                        .help("Git branch to pull before analysis"),
                )
                .arg(
                    Arg::new("no-sync")
                        .long("no-sync")
                        .action(ArgAction::SetTrue)
                        .help("Skip the git pull stage"),
                )
                .arg(
                    Arg::new("suffix-output")
                        .long("suffix-output")
                        .action(ArgAction::SetTrue)
                        .help("Write _fixed sibling files instead of overwriting in place"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the result as JSON"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("run", args)) => {
            let repo = args.get_one::<PathBuf>("repo").expect("required").clone();
            let timeout = *args.get_one::<u64>("timeout").expect("defaulted");
            let extensions: Vec<String> = args
                .get_many::<String>("ext")
                .expect("defaulted")
                .cloned()
                .collect();
            let interpreter = args.get_one::<String>("interpreter").expect("defaulted");
            let remote = args.get_one::<String>("remote").expect("defaulted");
            let branch = args.get_one::<String>("branch").expect("defaulted");

            let mut config = PipelineConfig::new()
                .with_extensions(extensions)
                .with_exec_timeout(timeout);
            if args.get_flag("no-sync") {
                config = config.without_sync();
            }

            let fixer = if args.get_flag("suffix-output") {
                RuleFixer::with_sibling_output("_fixed")
            } else {
                RuleFixer::new()
            };

            let pipeline = Pipeline::standard(
                &config,
                Arc::new(GitScm::new().with_remote(remote, branch)),
                Arc::new(PatternAnalyzer::new()),
                Arc::new(fixer),
                Arc::new(ProcessRunner::with_interpreter(interpreter)),
            );

            tracing::info!(repo = %repo.display(), "starting remediation run");
            let result = pipeline.run_path(&repo).await;

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }

            if !result.success {
                std::process::exit(1);
            }
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

fn print_report(result: &PipelineResult) {
    println!("=== Results ===");
    println!("Success: {}", result.success);
    println!("Summary: {}", result.summary);

    if !result.issues_found.is_empty() {
        println!("\nIssues found:");
        for issue in &result.issues_found {
            println!("  - {issue}");
        }
    }

    if !result.changes_made.is_empty() {
        println!("\nChanges applied:");
        for change in &result.changes_made {
            println!("  - {change}");
        }
    }

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in &result.errors {
            println!("  - {error}");
        }
    }
}
