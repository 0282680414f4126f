use crate::agents::{build_instruction, Analyst, Coder, ExecutorSettings, Reviewer};
use crate::config::Config;
use crate::discovery::{discover_csv_files, read_preview};
use crate::engine::Engine;
use crate::error::{FileError, RunnerError};
use crate::executor::CodeExecutor;
use crate::llm::CompletionClient;
use crate::output::write_session_report;
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::record::{BatchRecord, BatchStatus, SessionReport};
use super::score::extract_score;

/// Analyst -> Coder -> Reviewer for one file
struct FilePipeline {
    analyst: Analyst,
    coder: Coder,
    reviewer: Reviewer,
    preview_rows: usize,
}

impl FilePipeline {
    async fn run_stages(
        &self,
        record: &mut BatchRecord,
        input: &Path,
        output: &Path,
    ) -> Result<(), FileError> {
        let preview = read_preview(input, self.preview_rows)?;

        println!("  > Analyst is thinking...");
        let issues = self.analyst.run(&preview).await?;
        record.issues_detected = issues.clone();

        println!("  > Coder is fixing...");
        // The script runs in the executor's working dir, not ours
        let instruction = build_instruction(&absolute(input), &absolute(output));
        let (execution, code) = self.coder.run(&issues, &instruction).await?;

        println!("  > Reviewer is grading...");
        let grade = self.reviewer.run(&issues, &execution, &code).await?;

        record.quality_score = extract_score(&grade);
        record.reviewer_comments = grade;
        record.status = BatchStatus::Success;
        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

async fn process_file(
    pipeline: &FilePipeline,
    position: usize,
    total: usize,
    input: &Path,
    output_dir: &Path,
) -> BatchRecord {
    let filename = file_name_of(input);
    println!("\n[Batch {}/{}] Processing: {}", position, total, filename);

    let output = output_dir.join(format!("clean_{}", filename));
    let mut record = BatchRecord::new(&filename);

    match pipeline.run_stages(&mut record, input, &output).await {
        Ok(()) => {
            println!("  Done! Score: {}/100", record.quality_score);
            info!("Completed {} with score {}", filename, record.quality_score);
        }
        Err(e) => {
            println!("  ! FAILED: {}", e);
            warn!("Processing {} failed: {}", filename, e);
            record.status = BatchStatus::Error(e.to_string());
        }
    }

    record
}

/// Drives every input file through the agent pipeline and persists the report
pub struct BatchOrchestrator {
    config: Config,
    pipeline: Arc<FilePipeline>,
    semaphore: Arc<Semaphore>,
}

impl BatchOrchestrator {
    pub fn new(
        config: Config,
        engine: Arc<Engine>,
        client: Arc<dyn CompletionClient>,
        executor: Arc<dyn CodeExecutor>,
    ) -> Self {
        let settings = ExecutorSettings {
            working_dir: config.executor.working_dir.clone(),
            timeout: Duration::from_secs(config.executor.timeout_sec),
        };
        let pipeline = FilePipeline {
            analyst: Analyst::new(engine.clone(), client.clone()),
            coder: Coder::new(engine.clone(), client.clone(), executor, settings),
            reviewer: Reviewer::new(engine, client),
            preview_rows: config.preview_rows,
        };
        let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));

        Self {
            config,
            pipeline: Arc::new(pipeline),
            semaphore,
        }
    }

    /// Process the configured input directory and write the report once at the end
    pub async fn run(&self) -> Result<SessionReport, RunnerError> {
        let report = self
            .process_directory(&self.config.input_dir, &self.config.output_dir)
            .await?;
        write_session_report(&self.config.report_file, &report)?;
        info!(
            "Wrote report for {} files to {}",
            report.len(),
            self.config.report_file.display()
        );
        Ok(report)
    }

    /// One record per `*.csv` in `input_dir`, in file-name order.
    ///
    /// A failure in any stage is recorded on that file's record and never
    /// stops the batch.
    pub async fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<SessionReport, RunnerError> {
        let files = discover_csv_files(input_dir)?;
        let total = files.len();
        println!("--- Found {} files to process ---", total);
        info!(
            "Processing {} files from {} with concurrency {}",
            total,
            input_dir.display(),
            self.config.concurrency
        );

        let mut futures = FuturesUnordered::new();
        for (idx, input) in files.iter().cloned().enumerate() {
            let permit = self.semaphore.clone().acquire_owned().await?;
            let pipeline = self.pipeline.clone();
            let output_dir: PathBuf = output_dir.to_path_buf();

            futures.push(tokio::spawn(async move {
                let _permit = permit; // hold until done
                let record = process_file(&pipeline, idx + 1, total, &input, &output_dir).await;
                (idx, record)
            }));
        }

        let mut slots: Vec<Option<BatchRecord>> = vec![None; total];
        while let Some(joined) = futures.next().await {
            match joined {
                Ok((idx, record)) => slots[idx] = Some(record),
                Err(e) => warn!("File task panicked: {}", e),
            }
        }

        let mut report = SessionReport::default();
        for (slot, input) in slots.into_iter().zip(&files) {
            let record = slot.unwrap_or_else(|| {
                BatchRecord::failed(file_name_of(input), "processing task aborted")
            });
            report.push(record);
        }
        Ok(report)
    }
}
