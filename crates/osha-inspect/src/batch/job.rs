use std::fmt;

use serde::Serialize;

use crate::inspection::Inspection;

/// One identifier queued for fetch and parse. `index` is its position in
/// the submitted list and is used to restore input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub index: usize,
    pub identifier: String,
}

impl BatchJob {
    pub fn new(index: usize, identifier: impl Into<String>) -> Self {
        Self {
            index,
            identifier: identifier.into(),
        }
    }
}

/// Stage at which an identifier failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Fetch,
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Fetch => f.write_str("fetch"),
            FailureKind::Parse => f.write_str("parse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedItem {
    pub identifier: String,
    pub kind: FailureKind,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Parsed(Inspection),
    Failed { kind: FailureKind, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub index: usize,
    pub identifier: String,
    pub outcome: JobOutcome,
}

impl JobResult {
    pub fn success(job: &BatchJob, inspection: Inspection) -> Self {
        Self {
            index: job.index,
            identifier: job.identifier.clone(),
            outcome: JobOutcome::Parsed(inspection),
        }
    }

    pub fn failure(job: &BatchJob, kind: FailureKind, reason: String) -> Self {
        Self {
            index: job.index,
            identifier: job.identifier.clone(),
            outcome: JobOutcome::Failed { kind, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_result_failure() {
        let job = BatchJob::new(3, "317191393");
        let result = JobResult::failure(&job, FailureKind::Fetch, "timed out".to_string());

        assert_eq!(result.index, 3);
        assert_eq!(result.identifier, "317191393");
        assert_eq!(
            result.outcome,
            JobOutcome::Failed {
                kind: FailureKind::Fetch,
                reason: "timed out".to_string()
            }
        );
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Fetch.to_string(), "fetch");
        assert_eq!(FailureKind::Parse.to_string(), "parse");
        assert_eq!(serde_json::to_value(FailureKind::Parse).unwrap(), "parse");
    }
}
