//! Page downloads and the refresh cycle for cases that were still open
//! when their page was cached.

use log::{info, warn};
use tracing::info_span;

use crate::batch::job::{FailedItem, FailureKind};
use crate::batch::progress::{ProgressEvent, ProgressReporter};
use crate::error::{FetchError, StorageError};
use crate::fetch::{PageCache, PageFetcher};
use crate::inspection::{case_status, CaseStatus};

/// Result of [`refresh_open_cases`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    /// Identifiers whose cached page was not final and was fetched again.
    pub requeued: Vec<String>,
    pub failures: Vec<FailedItem>,
}

impl RefreshReport {
    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|failure| failure.identifier.as_str())
            .collect()
    }
}

/// Fetches each identifier and stores the page in `cache` without parsing.
/// Returns the identifiers that could not be fetched or stored, in input
/// order.
pub fn download_many<S: AsRef<str>>(
    fetcher: &dyn PageFetcher,
    cache: &PageCache,
    identifiers: &[S],
    progress: &dyn ProgressReporter,
) -> Vec<FailedItem> {
    let _span = info_span!("download", count = identifiers.len()).entered();
    info!("Downloading {} inspection pages", identifiers.len());

    let mut failures = Vec::new();
    for identifier in identifiers {
        let identifier = identifier.as_ref();
        let stored = fetcher
            .fetch(identifier)
            .and_then(|html| cache.store(identifier, &html).map_err(FetchError::from));

        match stored {
            Ok(_) => {
                info!("Downloaded inspection {}", identifier);
                progress.report(ProgressEvent::Stored {
                    identifier: identifier.to_string(),
                });
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Inspection {} failed ({}): {}", identifier, FailureKind::Fetch, reason);
                progress.report(ProgressEvent::Failed {
                    identifier: identifier.to_string(),
                    kind: FailureKind::Fetch,
                    reason: reason.clone(),
                });
                failures.push(FailedItem {
                    identifier: identifier.to_string(),
                    kind: FailureKind::Fetch,
                    reason,
                });
            }
        }
    }

    info!(
        "Downloaded {} of {} pages",
        identifiers.len() - failures.len(),
        identifiers.len()
    );
    failures
}

/// Cached identifiers whose page is not `CLOSED`. A page that cannot be
/// read is selected too, so the next refresh replaces it.
pub fn select_open_cases(cache: &PageCache) -> Result<Vec<String>, StorageError> {
    let mut open = Vec::new();
    for identifier in cache.cached_identifiers()? {
        match cache.load(&identifier) {
            Ok(html) => {
                if case_status(&html) != CaseStatus::Closed {
                    open.push(identifier);
                }
            }
            Err(e) => {
                warn!("Requeueing unreadable cached page {}: {}", identifier, e);
                open.push(identifier);
            }
        }
    }

    info!("{} cached inspections are not closed", open.len());
    Ok(open)
}

/// Re-fetches every cached page whose case is still open or unknown.
pub fn refresh_open_cases(
    fetcher: &dyn PageFetcher,
    cache: &PageCache,
    progress: &dyn ProgressReporter,
) -> Result<RefreshReport, StorageError> {
    let requeued = select_open_cases(cache)?;
    let failures = download_many(fetcher, cache, &requeued, progress);
    Ok(RefreshReport { requeued, failures })
}
