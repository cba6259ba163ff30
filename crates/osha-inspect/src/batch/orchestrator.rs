use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::batch::job::{BatchJob, FailedItem, FailureKind, JobOutcome, JobResult};
use crate::batch::pool::WorkerPool;
use crate::batch::progress::{NoopProgress, ProgressReporter};
use crate::batch::runner::process_one;
use crate::fetch::PageFetcher;
use crate::inspection::Inspection;

/// Outcome of one batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    records: Vec<(String, Inspection)>,
    failures: Vec<FailedItem>,
}

impl BatchReport {
    pub fn records(&self) -> &[(String, Inspection)] {
        &self.records
    }

    pub fn failures(&self) -> &[FailedItem] {
        &self.failures
    }

    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|failure| failure.identifier.as_str())
            .collect()
    }

    /// Records keyed by identifier. A repeated identifier keeps its last
    /// record.
    pub fn records_by_identifier(&self) -> HashMap<&str, &Inspection> {
        self.records
            .iter()
            .map(|(identifier, inspection)| (identifier.as_str(), inspection))
            .collect()
    }

    pub fn into_parts(self) -> (Vec<(String, Inspection)>, Vec<FailedItem>) {
        (self.records, self.failures)
    }
}

/// Drives fetch+parse over many identifiers.
pub struct BatchOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    progress: Arc<dyn ProgressReporter>,
    worker_count: usize,
}

impl BatchOrchestrator {
    /// Sequential orchestrator with no progress reporting.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            progress: Arc::new(NoopProgress),
            worker_count: 1,
        }
    }

    /// Values below 1 are treated as 1.
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Fetches and parses every identifier. Never stops early: each
    /// identifier ends up in exactly one of the report's records or
    /// failures, and both lists follow input order.
    pub fn process_many<S: AsRef<str>>(&self, identifiers: &[S]) -> BatchReport {
        let started_at = Utc::now();
        let jobs: Vec<BatchJob> = identifiers
            .iter()
            .enumerate()
            .map(|(index, identifier)| BatchJob::new(index, identifier.as_ref()))
            .collect();

        info!(
            "Processing {} inspections with {} worker(s)",
            jobs.len(),
            self.worker_count
        );

        let results = if self.worker_count == 1 || jobs.len() < 2 {
            jobs.iter()
                .map(|job| process_one(self.fetcher.as_ref(), job, self.progress.as_ref()))
                .collect()
        } else {
            self.run_parallel(&jobs)
        };

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result.outcome {
                JobOutcome::Parsed(inspection) => records.push((result.identifier, inspection)),
                JobOutcome::Failed { kind, reason } => failures.push(FailedItem {
                    identifier: result.identifier,
                    kind,
                    reason,
                }),
            }
        }

        info!(
            "Batch finished: {} parsed, {} failed",
            records.len(),
            failures.len()
        );

        BatchReport {
            started_at,
            finished_at: Utc::now(),
            records,
            failures,
        }
    }

    /// Runs `jobs` on a pool and returns one result per job, sorted by
    /// submission index.
    fn run_parallel(&self, jobs: &[BatchJob]) -> Vec<JobResult> {
        let workers = self.worker_count.min(jobs.len());
        let mut pool = WorkerPool::new(Arc::clone(&self.fetcher), Arc::clone(&self.progress), workers);

        let mut slots: Vec<Option<JobResult>> = vec![None; jobs.len()];
        for job in jobs {
            if let Err(e) = pool.submit(job.clone()) {
                error!("Failed to queue inspection {}: {}", job.identifier, e);
                break;
            }
        }
        pool.close();

        while let Some(result) = pool.recv_result() {
            let index = result.index;
            slots[index] = Some(result);
        }
        if let Err(e) = pool.wait() {
            error!("Worker pool error: {}", e);
        }

        // A job with no result was lost to a dead worker or a closed queue.
        jobs.iter()
            .zip(slots)
            .map(|(job, slot)| {
                slot.unwrap_or_else(|| {
                    JobResult::failure(
                        job,
                        FailureKind::Parse,
                        "inspection was not processed by any worker".to_string(),
                    )
                })
            })
            .collect()
    }
}
