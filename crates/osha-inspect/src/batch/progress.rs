use crate::batch::job::FailureKind;

/// Per-identifier events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started {
        identifier: String,
    },
    Parsed {
        identifier: String,
    },
    Stored {
        identifier: String,
    },
    Failed {
        identifier: String,
        kind: FailureKind,
        reason: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Reporter for callers that only need the final report. Outcomes are
/// logged by the runner either way.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}
