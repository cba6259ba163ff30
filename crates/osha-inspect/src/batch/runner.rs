use log::{info, warn};
use tracing::{debug, info_span};

use crate::batch::job::{BatchJob, FailureKind, JobResult};
use crate::batch::progress::{ProgressEvent, ProgressReporter};
use crate::fetch::PageFetcher;
use crate::inspection::parse_inspection;

/// Fetch then parse one identifier. Never panics on bad input; every
/// failure becomes a [`JobResult::failure`] tagged with its stage.
///
/// The outcome is always logged, whatever `progress` does with it.
pub fn process_one(
    fetcher: &dyn PageFetcher,
    job: &BatchJob,
    progress: &dyn ProgressReporter,
) -> JobResult {
    let _span = info_span!("inspection", identifier = %job.identifier, index = job.index).entered();

    progress.report(ProgressEvent::Started {
        identifier: job.identifier.clone(),
    });

    // Step 1: Fetch
    let html = {
        let _step = info_span!("fetch").entered();
        match fetcher.fetch(&job.identifier) {
            Ok(html) => html,
            Err(e) => return fail(job, FailureKind::Fetch, e.to_string(), progress),
        }
    };

    // Step 2: Parse
    let inspection = {
        let _step = info_span!("parse", bytes = html.len()).entered();
        match parse_inspection(&html) {
            Ok(inspection) => inspection,
            Err(e) => return fail(job, FailureKind::Parse, e.to_string(), progress),
        }
    };

    debug!(case_status = %inspection.case_status, "parsed");
    info!("Parsed inspection {}", job.identifier);
    progress.report(ProgressEvent::Parsed {
        identifier: job.identifier.clone(),
    });
    JobResult::success(job, inspection)
}

fn fail(
    job: &BatchJob,
    kind: FailureKind,
    reason: String,
    progress: &dyn ProgressReporter,
) -> JobResult {
    warn!("Inspection {} failed ({}): {}", job.identifier, kind, reason);
    progress.report(ProgressEvent::Failed {
        identifier: job.identifier.clone(),
        kind,
        reason: reason.clone(),
    });
    JobResult::failure(job, kind, reason)
}
