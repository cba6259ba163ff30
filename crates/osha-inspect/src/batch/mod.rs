pub mod job;
pub mod orchestrator;
pub mod pool;
pub mod progress;
pub mod refresh;
pub mod runner;

pub use job::{BatchJob, FailedItem, FailureKind, JobOutcome, JobResult};
pub use orchestrator::{BatchOrchestrator, BatchReport};
pub use pool::WorkerPool;
pub use progress::{NoopProgress, ProgressEvent, ProgressReporter};
pub use refresh::{download_many, refresh_open_cases, select_open_cases, RefreshReport};
pub use runner::process_one;
