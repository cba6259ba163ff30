//! Sources of raw inspection-detail HTML.

pub mod cache;
pub mod http;

pub use cache::{CacheFirstFetcher, CachedPageFetcher, CachingFetcher, PageCache};
pub use http::HttpFetcher;

use crate::error::FetchError;

/// Returns the raw detail-page HTML for one inspection identifier.
///
/// Implementations are shared across batch workers. Retries are the
/// implementation's business; callers treat any error as final.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}
