//! Pre-fetched corpus on disk
//!
//! Each page lives in one file under the cache directory, named by the hex
//! SHA-256 of its URL. A URL without a file has no destination.

use crate::crawler::corpus::{Corpus, FetchResult};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name a URL is cached under
///
/// # Examples
///
/// ```
/// use weir::crawler::cache_file_name;
///
/// let name = cache_file_name("http://www.ics.uci.edu/");
/// assert_eq!(name.len(), 64);
/// assert_eq!(name, cache_file_name("http://www.ics.uci.edu/"));
/// ```
pub fn cache_file_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Corpus reading pages from a cache directory
#[derive(Debug, Clone)]
pub struct CacheCorpus {
    dir: PathBuf,
}

impl CacheCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the URL would be cached at
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_file_name(url))
    }
}

impl Corpus for CacheCorpus {
    async fn fetch(&self, url: &str) -> FetchResult {
        match tokio::fs::read(self.path_for(url)).await {
            Ok(content) => FetchResult::ok(url, content),
            Err(e) if e.kind() == ErrorKind::NotFound => FetchResult::new(url, 404),
            Err(e) => {
                tracing::warn!("Failed to read cached page for {}: {}", url, e);
                FetchResult::failed(url, e.to_string())
            }
        }
    }

    fn resolve_destination(&self, url: &str) -> Option<String> {
        let name = cache_file_name(url);
        self.dir.join(&name).is_file().then_some(name)
    }
}
