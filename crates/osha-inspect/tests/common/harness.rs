//! Fake page source and an isolated cache directory for batch tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tempfile::TempDir;

use osha_inspect::error::FetchError;
use osha_inspect::fetch::{PageCache, PageFetcher};

/// Serves pages from memory. Unknown identifiers fail like a 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, identifier: &str, html: impl Into<String>) -> Self {
        self.pages.insert(identifier.to_string(), html.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(identifier.to_string());
        self.pages
            .get(identifier)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                identifier: identifier.to_string(),
                status: 404,
            })
    }
}

/// Temporary directory with a page cache inside it.
pub struct TestHarness {
    temp_dir: TempDir,
    pub cache_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cache_dir = temp_dir.path().join("Inspections");
        Self {
            temp_dir,
            cache_dir,
        }
    }

    pub fn cache(&self) -> PageCache {
        PageCache::new(&self.cache_dir)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
