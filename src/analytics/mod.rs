//! Crawl analytics
//!
//! [`AnalyticsState`] is the single owner of all aggregate crawl state:
//! subdomain visit counts, the word histogram, extremum records, downloaded
//! URLs and the trap log. The controller owns one per crawl and lends it to
//! the extractor and filter by mutable reference.

mod histogram;
mod report;
mod traps;

pub use histogram::WordHistogram;
pub use report::{AnalyticsReport, Extremum, Redirect, RedirectKind, TOP_WORDS};
pub use traps::{TrapLog, TrapRecord};

use crate::text::is_stopword;
use std::collections::BTreeMap;

/// Mutable analytics for one crawl run
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    subdomains: BTreeMap<String, u64>,
    histogram: WordHistogram,
    longest_page: Extremum,
    most_outlinks: Extremum,
    downloaded_urls: Vec<String>,
    redirects: Vec<Redirect>,
    /// Identified traps and the recent-trap window
    pub traps: TrapLog,
}

impl AnalyticsState {
    /// Creates empty analytics with a trap window of `trap_capacity` URLs
    pub fn new(trap_capacity: usize) -> Self {
        Self {
            subdomains: BTreeMap::new(),
            histogram: WordHistogram::new(),
            longest_page: Extremum::default(),
            most_outlinks: Extremum::default(),
            downloaded_urls: Vec::new(),
            redirects: Vec::new(),
            traps: TrapLog::new(trap_capacity),
        }
    }

    /// Records that a URL was fetched
    pub fn record_download(&mut self, url: &str) {
        self.downloaded_urls.push(url.to_string());
    }

    /// Offers a page's admitted outlink count to the most-outlinks record
    pub fn record_outlink_count(&mut self, url: &str, count: usize) {
        if self.most_outlinks.offer(url, count) {
            tracing::debug!("New most-outlinks page: {} ({})", url, count);
        }
    }

    /// Counts one parsed page against its hostname
    pub fn record_page_visit(&mut self, host: &str) {
        *self.subdomains.entry(host.to_string()).or_insert(0) += 1;
    }

    /// Adds a page's tokens to the histogram and the longest-page record
    ///
    /// Stopwords are never inserted into the histogram, but the page length
    /// counts every token.
    pub fn record_page_words(&mut self, url: &str, tokens: &[String]) {
        for token in tokens.iter().filter(|t| !is_stopword(t)) {
            self.histogram.add(token);
        }
        self.longest_page.offer(url, tokens.len());
    }

    /// Records a redirect from a requested URL to where the page ended up
    pub fn record_redirect(
        &mut self,
        from: &str,
        to: &str,
        status_code: u16,
        kind: RedirectKind,
    ) {
        self.redirects.push(Redirect {
            from: from.to_string(),
            to: to.to_string(),
            status_code,
            kind,
        });
    }

    pub fn subdomains(&self) -> &BTreeMap<String, u64> {
        &self.subdomains
    }

    pub fn histogram(&self) -> &WordHistogram {
        &self.histogram
    }

    pub fn longest_page(&self) -> &Extremum {
        &self.longest_page
    }

    pub fn most_outlinks(&self) -> &Extremum {
        &self.most_outlinks
    }

    pub fn downloaded_urls(&self) -> &[String] {
        &self.downloaded_urls
    }

    pub fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }

    /// Builds an immutable report, ranking the histogram at call time
    pub fn snapshot(&self) -> AnalyticsReport {
        AnalyticsReport {
            subdomain_count: self.subdomains.clone(),
            most_outlinks: self.most_outlinks.clone(),
            downloaded_urls: self.downloaded_urls.clone(),
            identified_traps: self.traps.identified().to_vec(),
            longest_page: self.longest_page.clone(),
            top_50_words: self.histogram.top(TOP_WORDS),
            redirects: self.redirects.clone(),
        }
    }
}
