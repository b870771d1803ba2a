//! Frontier: the URL queue the crawler consumes
//!
//! The frontier owns de-duplication and ordering. The controller only asks
//! it for the next URL and offers it admitted candidates.

use crate::storage::StorageResult;
use std::collections::{HashSet, VecDeque};

/// URL queue with de-duplication
pub trait Frontier {
    /// True if a URL is waiting to be fetched
    fn has_next(&self) -> StorageResult<bool>;

    /// Takes the next URL to fetch and counts it as fetched
    fn next_url(&mut self) -> StorageResult<Option<String>>;

    /// Adds a URL, returning false if it was already known
    fn add_url(&mut self, url: &str) -> StorageResult<bool>;

    /// Number of URLs waiting to be fetched
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of URLs handed out so far
    fn fetched(&self) -> StorageResult<u64>;
}

/// In-memory FIFO frontier
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    fetched: u64,
}

impl MemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for MemoryFrontier {
    fn has_next(&self) -> StorageResult<bool> {
        Ok(!self.queue.is_empty())
    }

    fn next_url(&mut self) -> StorageResult<Option<String>> {
        let next = self.queue.pop_front();
        if next.is_some() {
            self.fetched += 1;
        }
        Ok(next)
    }

    fn add_url(&mut self, url: &str) -> StorageResult<bool> {
        if !self.seen.insert(url.to_string()) {
            return Ok(false);
        }
        self.queue.push_back(url.to_string());
        Ok(true)
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.queue.len())
    }

    fn fetched(&self) -> StorageResult<u64> {
        Ok(self.fetched)
    }
}
