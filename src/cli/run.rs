use crate::cli::RunArgs;
use crate::config::Config;
use crate::credential::resolve_api_key;
use crate::discovery::discover_csv_files;
use crate::engine::{ensure_directories, init_console_logging, init_logging, Engine};
use crate::executor::{CodeExecutor, SubprocessExecutor};
use crate::llm::ChatClient;
use crate::output::render_summary;
use crate::runner::{BatchOrchestrator, BatchStatus, SessionReport};
use crate::state::StateStore;
use chrono::Local;
use serde_json::{json, Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn execute(args: RunArgs, verbose: bool) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(input_dir) = args.input_dir {
        config.input_dir = input_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(report_file) = args.report_file {
        config.report_file = report_file;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_sec) = args.timeout_sec {
        config.executor.timeout_sec = timeout_sec;
    }

    config.validate()?;

    if args.dry_run {
        init_console_logging(verbose);
        info!("DRY RUN - no model calls or script executions");
        print_execution_plan(&config);
        return Ok(());
    }

    // Fail before any directory or agent work when no key is available
    let api_key = resolve_api_key(&config.llm.api_key_env)?;

    let state_dir = config.state_file.parent().unwrap_or(Path::new(""));
    ensure_directories(&[
        config.output_dir.as_path(),
        state_dir,
        config.log_dir.as_path(),
    ])?;
    let log_file = init_logging(&config.log_dir, verbose)?;

    let client = ChatClient::new(&config.llm, Some(api_key))?;
    info!("Using model {}", client.model());

    let executor = SubprocessExecutor::new(
        config.executor.interpreter.clone(),
        config.executor.script_name.clone(),
    )
    .with_unique_scripts(config.concurrency > 1);

    let engine = Arc::new(Engine::new(
        StateStore::new(&config.state_file),
        Some(log_file),
    ));
    let orchestrator = BatchOrchestrator::new(
        config.clone(),
        engine.clone(),
        Arc::new(client),
        Arc::new(executor),
    );

    let report = orchestrator.run().await?;
    if report.is_empty() {
        warn!("No CSV files found in {}", config.input_dir.display());
    }

    println!("\n{}", render_summary(&report));
    println!(
        "\n--- Batch Complete. Report saved to {} ---",
        config.report_file.display()
    );
    if let Some(log_file) = engine.log_file() {
        println!("Log: {}", log_file.display());
    }

    record_run_state(engine.state(), &report, &config.report_file);
    Ok(())
}

/// Persist a run summary under `last_run` and merge per-file scores into `scores`
fn record_run_state(store: &StateStore, report: &SessionReport, report_file: &Path) {
    let totals = report.totals();
    let last_run = json!({
        "timestamp": Local::now().to_rfc3339(),
        "files": totals.total,
        "succeeded": totals.succeeded,
        "failed": totals.failed,
        "mean_score": totals.mean_score,
        "report_file": report_file.display().to_string(),
    });
    if let Err(e) = store.save("last_run", &last_run) {
        warn!("Failed to save state: {}", e);
    }

    let mut scores = match store.get("scores") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for record in &report.records {
        let score = match record.status {
            BatchStatus::Success => json!(record.quality_score),
            _ => Value::Null,
        };
        scores.insert(
            record.filename.clone(),
            json!({
                "score": score,
                "status": record.status.to_string(),
                "timestamp": record.timestamp.to_rfc3339(),
            }),
        );
    }
    if let Err(e) = store.save("scores", &scores) {
        warn!("Failed to save state: {}", e);
    }
}

fn print_execution_plan(config: &Config) {
    println!("\n=== Execution Plan ===\n");
    println!("Input dir: {}", config.input_dir.display());
    println!("Output dir: {}", config.output_dir.display());
    println!("Report file: {}", config.report_file.display());
    println!("Concurrency: {}", config.concurrency);
    println!("Model: {}", config.llm.model);

    let executor = SubprocessExecutor::new(
        config.executor.interpreter.clone(),
        config.executor.script_name.clone(),
    );
    println!(
        "Executor: {} ({}, timeout {}s, cwd {})",
        executor.name(),
        config.executor.interpreter.display(),
        config.executor.timeout_sec,
        config.executor.working_dir.display()
    );

    match discover_csv_files(&config.input_dir) {
        Ok(files) if files.is_empty() => println!("\nNo CSV files found."),
        Ok(files) => {
            println!("\nFiles to process:");
            for file in &files {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                println!(
                    "  - {} -> {}",
                    name,
                    config.output_dir.join(format!("clean_{}", name)).display()
                );
            }
        }
        Err(e) => println!("\n{}", e),
    }
    println!();
}
