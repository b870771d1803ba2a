use crate::analytics::TrapRecord;
use std::collections::BTreeMap;

/// Number of words kept in the report's frequency ranking
pub const TOP_WORDS: usize = 50;

/// A page holding a running maximum (longest page, most outlinks)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extremum {
    pub url: Option<String>,
    pub count: usize,
}

impl Extremum {
    /// Replaces the record only on a strictly greater count
    ///
    /// Ties keep the earlier page. Returns true if the record changed.
    pub fn offer(&mut self, url: &str, count: usize) -> bool {
        if count > self.count {
            self.url = Some(url.to_string());
            self.count = count;
            true
        } else {
            false
        }
    }
}

/// How a page moved to another URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// 3xx response followed by the corpus
    Http,
    /// `<meta http-equiv="refresh">` followed by the controller
    Refresh,
}

/// A redirect observed during the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub from: String,
    pub to: String,
    /// Status of the fetch at `to`
    pub status_code: u16,
    pub kind: RedirectKind,
}

/// Point-in-time snapshot of crawl analytics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub subdomain_count: BTreeMap<String, u64>,
    pub most_outlinks: Extremum,
    pub downloaded_urls: Vec<String>,
    pub identified_traps: Vec<TrapRecord>,
    pub longest_page: Extremum,
    pub top_50_words: Vec<(String, u64)>,
    pub redirects: Vec<Redirect>,
}

impl AnalyticsReport {
    pub fn downloaded_urls_count(&self) -> usize {
        self.downloaded_urls.len()
    }

    pub fn identified_traps_count(&self) -> usize {
        self.identified_traps.len()
    }
}
