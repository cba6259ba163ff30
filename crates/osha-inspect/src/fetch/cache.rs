use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{FetchError, StorageError};
use crate::fetch::PageFetcher;
use crate::sanitize;

const PAGE_EXTENSION: &str = "html";
const PARTIAL_EXTENSION: &str = "part";

/// Directory of downloaded detail pages, one `<identifier>.html` per
/// inspection.
#[derive(Debug, Clone)]
pub struct PageCache {
    directory: PathBuf,
}

impl PageCache {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn ensure_directory(&self) -> Result<(), StorageError> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory).map_err(|e| StorageError::CreateDirectory {
                path: self.directory.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    pub fn page_path(&self, identifier: &str) -> Result<PathBuf, StorageError> {
        let identifier = sanitize::validate_identifier(identifier)?;
        Ok(self
            .directory
            .join(format!("{}.{}", identifier, PAGE_EXTENSION)))
    }

    /// Writes `html` for `identifier`, replacing any earlier copy.
    ///
    /// The page is written next to its final name and renamed into place,
    /// so a concurrent reader never sees a half-written file.
    pub fn store(&self, identifier: &str, html: &str) -> Result<PathBuf, StorageError> {
        self.ensure_directory()?;
        let path = self.page_path(identifier)?;
        let partial = path.with_extension(format!("{}.{}", PAGE_EXTENSION, PARTIAL_EXTENSION));

        fs::write(&partial, html).map_err(|e| StorageError::WriteFile {
            path: partial.clone(),
            source: e,
        })?;
        fs::rename(&partial, &path).map_err(|e| StorageError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        debug!("Cached {}", sanitize::redact_path(&path));
        Ok(path)
    }

    pub fn load(&self, identifier: &str) -> Result<String, FetchError> {
        let path = self.page_path(identifier)?;
        match fs::read_to_string(&path) {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FetchError::NotCached(identifier.to_string()))
            }
            Err(e) => Err(StorageError::ReadFile { path, source: e }.into()),
        }
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.page_path(identifier)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Identifiers of every cached page, sorted. A missing directory is an
    /// empty cache.
    pub fn cached_identifiers(&self) -> Result<Vec<String>, StorageError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }

        let mut identifiers = Vec::new();
        for entry in WalkDir::new(&self.directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| StorageError::ScanFailed {
                path: self.directory.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if sanitize::validate_identifier(stem).is_ok() {
                    identifiers.push(stem.to_string());
                }
            }
        }

        identifiers.sort();
        info!(
            "Found {} cached pages in {}",
            identifiers.len(),
            self.directory.display()
        );
        Ok(identifiers)
    }
}

/// Serves pages from the cache only; an uncached identifier is a
/// [`FetchError::NotCached`].
pub struct CachedPageFetcher {
    cache: PageCache,
}

impl CachedPageFetcher {
    pub fn new(cache: PageCache) -> Self {
        Self { cache }
    }
}

impl PageFetcher for CachedPageFetcher {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        self.cache.load(identifier)
    }
}

/// Fetches through `inner` and stores every page it receives.
pub struct CachingFetcher {
    inner: Arc<dyn PageFetcher>,
    cache: PageCache,
}

impl CachingFetcher {
    pub fn new(inner: Arc<dyn PageFetcher>, cache: PageCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }
}

impl PageFetcher for CachingFetcher {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let html = self.inner.fetch(identifier)?;
        self.cache.store(identifier, &html)?;
        Ok(html)
    }
}

/// Serves cached pages and fetches the rest through `remote`, storing
/// what it receives.
pub struct CacheFirstFetcher {
    remote: CachingFetcher,
}

impl CacheFirstFetcher {
    pub fn new(remote: Arc<dyn PageFetcher>, cache: PageCache) -> Self {
        Self {
            remote: CachingFetcher::new(remote, cache),
        }
    }
}

impl PageFetcher for CacheFirstFetcher {
    fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        match self.remote.cache().load(identifier) {
            Err(FetchError::NotCached(_)) => self.remote.fetch(identifier),
            cached => cached,
        }
    }
}
