use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, error, info};

use crate::batch::job::{BatchJob, JobResult};
use crate::batch::progress::ProgressReporter;
use crate::batch::runner::process_one;
use crate::error::WorkerError;
use crate::fetch::PageFetcher;

/// Fixed set of threads running fetch+parse jobs.
///
/// Jobs go in over a bounded channel; results come back unbounded so a
/// producer blocked on a full queue can never stall a worker.
pub struct WorkerPool {
    job_sender: Option<Sender<BatchJob>>,
    result_receiver: Receiver<JobResult>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// # Panics
    /// Panics if `worker_count` is 0.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        progress: Arc<dyn ProgressReporter>,
        worker_count: usize,
    ) -> Self {
        assert!(worker_count > 0, "worker_count must be > 0");
        let (job_sender, job_receiver) = bounded::<BatchJob>(worker_count * 2);
        let (result_sender, result_receiver) = unbounded::<JobResult>();

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let worker_fetcher = Arc::clone(&fetcher);
            let worker_progress = Arc::clone(&progress);

            let handle = thread::spawn(move || {
                run_worker(
                    worker_id,
                    job_rx,
                    result_tx,
                    worker_fetcher,
                    worker_progress,
                );
            });

            workers.push(handle);
        }

        info!("Started {} workers", worker_count);

        Self {
            job_sender: Some(job_sender),
            result_receiver,
            workers,
        }
    }

    /// Blocks while the job queue is full.
    pub fn submit(&self, job: BatchJob) -> Result<(), WorkerError> {
        self.job_sender
            .as_ref()
            .ok_or(WorkerError::ChannelClosed)?
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Stops accepting jobs. Workers exit once the queue drains, after
    /// which [`WorkerPool::recv_result`] returns `None`.
    pub fn close(&mut self) {
        self.job_sender = None;
    }

    pub fn recv_result(&self) -> Option<JobResult> {
        self.result_receiver.recv().ok()
    }

    /// Joins every worker. Reports the first worker that panicked.
    pub fn wait(mut self) -> Result<(), WorkerError> {
        self.close();

        let mut outcome = Ok(());
        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Worker {} panicked: {:?}", i, e);
                if outcome.is_ok() {
                    outcome = Err(WorkerError::Panicked(i));
                }
            } else {
                debug!("Worker {} finished", i);
            }
        }

        info!("All workers have stopped");
        outcome
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<BatchJob>,
    result_sender: Sender<JobResult>,
    fetcher: Arc<dyn PageFetcher>,
    progress: Arc<dyn ProgressReporter>,
) {
    debug!("Worker {} started", worker_id);

    // Ends once the pool is closed and the queue has drained.
    for job in job_receiver.iter() {
        debug!("Worker {} processing inspection {}", worker_id, job.identifier);

        let result = process_one(fetcher.as_ref(), &job, progress.as_ref());

        if let Err(e) = result_sender.send(result) {
            error!("Worker {} failed to send result: {}", worker_id, e);
            break;
        }
    }

    debug!("Worker {} stopped", worker_id);
}
