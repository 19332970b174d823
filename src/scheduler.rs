//! Bounded-concurrency extraction scheduling.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::job::{Extractor, JobSpec};
use crate::result::ExtractionResult;

/// Runs extraction jobs under a concurrency cap and collects their results.
///
/// All jobs are spawned up front; a semaphore admits at most `concurrency`
/// of them into their fetch at a time, the rest queue FIFO on the permits.
/// Results are collected in completion order, not submission order.
pub struct ExtractionScheduler {
    extractor: Arc<Extractor>,
    concurrency: usize,
    stop_on_first_error: bool,
    error_log: Option<PathBuf>,
}

impl ExtractionScheduler {
    /// Creates a scheduler over the given extractor.
    pub fn new(extractor: Arc<Extractor>, concurrency: usize) -> Self {
        Self {
            extractor,
            concurrency: concurrency.max(1),
            stop_on_first_error: false,
            error_log: None,
        }
    }

    /// Stops the run as soon as one job reports a failed result. In-flight
    /// jobs are aborted best-effort; results collected so far (including the
    /// failed one) are returned.
    pub fn stop_on_first_error(mut self, stop: bool) -> Self {
        self.stop_on_first_error = stop;
        self
    }

    /// After the run, writes failed results as a JSON array to this path.
    pub fn with_error_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log = Some(path.into());
        self
    }

    /// Runs all jobs and returns their results in completion order.
    ///
    /// Per-job failures are data (`status = Failed`), never errors; callers
    /// needing a stable order must sort the returned list themselves.
    pub async fn run_all(&self, specs: Vec<JobSpec>) -> Vec<ExtractionResult> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for spec in specs {
            let semaphore = Arc::clone(&semaphore);
            let extractor = Arc::clone(&self.extractor);
            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        let mode = spec.mode.unwrap_or(extractor.options().mode);
                        return ExtractionResult::failed(&spec.url, mode, "scheduler shut down", 0);
                    }
                };
                extractor.extract(&spec).await
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    if result.is_success() {
                        info!(url = %result.url, words = result.word_count, "Extracted");
                    } else {
                        warn!(
                            url = %result.url,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "Extraction failed"
                        );
                    }

                    let failed = !result.is_success();
                    results.push(result);

                    if failed && self.stop_on_first_error {
                        warn!("Stopping run after first failed job");
                        tasks.abort_all();
                        break;
                    }
                }
                // Aborted jobs are expected after an early stop.
                Err(e) if e.is_cancelled() => continue,
                Err(e) => warn!(error = %e, "Extraction task panicked"),
            }
        }

        self.write_error_log(&results);
        results
    }

    /// Writes failed results to the configured log. Log failures are
    /// reported but never invalidate the run's results.
    fn write_error_log(&self, results: &[ExtractionResult]) {
        let Some(path) = &self.error_log else {
            return;
        };

        let failed: Vec<&ExtractionResult> = results.iter().filter(|r| !r.is_success()).collect();
        if failed.is_empty() {
            return;
        }

        match serde_json::to_string_pretty(&failed) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    warn!(path = %path.display(), error = %e, "Failed to write error log");
                } else {
                    info!(path = %path.display(), errors = failed.len(), "Wrote error log");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize error log"),
        }
    }
}
