//! Crawl controller - the main crawl loop
//!
//! Each step pulls one URL from the frontier, fetches it through the corpus,
//! extracts its links, runs every candidate through the admission filter and
//! offers the admitted ones back to the frontier. All analytics for the run
//! live in the controller's [`AnalyticsState`].

use crate::analytics::{AnalyticsReport, AnalyticsState, RedirectKind};
use crate::crawler::corpus::{Corpus, FetchResult};
use crate::crawler::extractor::extract_next_links;
use crate::crawler::frontier::Frontier;
use crate::filter::{Admission, RejectReason, TrapFilter};
use crate::storage::StorageResult;
use crate::url::{parse_absolute, strip_fragment};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Controller state between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// The frontier has a next URL
    Running,
    /// The frontier is exhausted, the page limit was reached, or a stop was requested
    Done,
}

/// What happened to a candidate offered to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offer {
    /// The admission filter rejected it
    Rejected(RejectReason),
    /// The corpus has no destination for it
    NoDestination,
    /// The frontier already knew it
    Duplicate,
    /// Newly added to the frontier
    Enqueued,
}

impl Offer {
    pub fn passed_filter(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Drives one crawl run
pub struct Controller<C> {
    corpus: C,
    frontier: Box<dyn Frontier + Send>,
    filter: TrapFilter,
    analytics: AnalyticsState,
    max_pages: usize,
    shutdown: Arc<AtomicBool>,
}

impl<C: Corpus> Controller<C> {
    /// Creates a controller with empty analytics
    pub fn new(corpus: C, frontier: Box<dyn Frontier + Send>, filter: TrapFilter) -> Self {
        let analytics = AnalyticsState::new(filter.config().recent_traps_capacity);
        Self {
            corpus,
            frontier,
            filter,
            analytics,
            max_pages: 0,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stops the crawl after `max_pages` downloads (0 = unlimited)
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Flag that stops the crawl before the next page once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Adds seed URLs to the frontier without filtering them
    ///
    /// Returns how many were new to the frontier.
    pub fn seed(&mut self, seeds: &[String]) -> StorageResult<usize> {
        let mut added = 0;
        for seed in seeds {
            if self.frontier.add_url(seed)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn state(&self) -> StorageResult<CrawlState> {
        let stopped = self.shutdown.load(Ordering::SeqCst);
        let limit_reached =
            self.max_pages > 0 && self.analytics.downloaded_urls().len() >= self.max_pages;

        if stopped || limit_reached || !self.frontier.has_next()? {
            Ok(CrawlState::Done)
        } else {
            Ok(CrawlState::Running)
        }
    }

    /// Processes the next URL of the frontier
    ///
    /// Page-level failures are logged and skipped. Only frontier storage
    /// errors are returned.
    pub async fn step(&mut self) -> crate::Result<CrawlState> {
        if self.state()? == CrawlState::Done {
            return Ok(CrawlState::Done);
        }

        let Some(url) = self.frontier.next_url()? else {
            return Ok(CrawlState::Done);
        };

        tracing::info!(
            "Fetching URL {} ... Fetched: {}, Queue size: {}",
            url,
            self.frontier.fetched()?,
            self.frontier.len()?
        );

        let mut fetch = self.corpus.fetch(&url).await;
        let refreshed_status = self.process_page(&url, &mut fetch).await?;

        if fetch.is_redirected {
            let (status, kind) = match refreshed_status {
                Some(status) => (status, RedirectKind::Refresh),
                None => (fetch.status_code, RedirectKind::Http),
            };
            let to = fetch.effective_url();
            tracing::debug!("{} redirected to {} ({:?})", url, to, kind);
            self.analytics.record_redirect(&url, to, status, kind);
        }

        Ok(self.state()?)
    }

    /// Runs steps until the crawl is done
    pub async fn run(&mut self) -> crate::Result<()> {
        let start_time = Instant::now();

        while self.step().await? == CrawlState::Running {}

        if self.shutdown.load(Ordering::SeqCst) {
            tracing::warn!("Crawl stopped on request");
        } else if self.max_pages > 0 && self.analytics.downloaded_urls().len() >= self.max_pages
        {
            tracing::info!("Page limit of {} reached", self.max_pages);
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        tracing::info!(
            "Crawl finished: {} pages downloaded, {} traps identified in {:?}",
            self.analytics.downloaded_urls().len(),
            self.analytics.traps.identified().len(),
            start_time.elapsed()
        );

        Ok(())
    }

    /// Filters a candidate and offers it to the frontier if admitted
    pub fn offer(&mut self, candidate: &str) -> StorageResult<Offer> {
        if let Admission::Reject(reason) = self.filter.evaluate(candidate, &mut self.analytics.traps)
        {
            return Ok(Offer::Rejected(reason));
        }

        if self.corpus.resolve_destination(candidate).is_none() {
            tracing::trace!("No destination for {}", candidate);
            return Ok(Offer::NoDestination);
        }

        if self.frontier.add_url(candidate)? {
            Ok(Offer::Enqueued)
        } else {
            Ok(Offer::Duplicate)
        }
    }

    /// Extracts and offers a page's links
    ///
    /// Returns the status of the meta-refresh target if one was followed.
    async fn process_page(
        &mut self,
        url: &str,
        fetch: &mut FetchResult,
    ) -> StorageResult<Option<u16>> {
        self.analytics.record_download(url);

        let extraction = match extract_next_links(fetch, &mut self.analytics) {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::error!("Error parsing content from {}: {}", url, e);
                return Ok(None);
            }
        };

        let page_url = fetch.effective_url().to_string();

        let mut admitted = 0;
        for candidate in &extraction.outlinks {
            if self.offer(candidate)?.passed_filter() {
                admitted += 1;
            }
        }
        self.analytics.record_outlink_count(&page_url, admitted);

        // Only the first refresh directive takes effect, and a page
        // reloading itself is not a redirect
        let mut refreshed_status = None;
        for (i, target) in extraction.refreshes.iter().enumerate() {
            let offer = self.offer(target)?;
            if i == 0 && offer.passed_filter() && !is_same_page(target, &page_url) {
                refreshed_status = Some(self.follow_refresh(url, fetch, target).await);
            }
        }

        Ok(refreshed_status)
    }

    /// Fetches a meta-refresh target and marks the page as redirected
    ///
    /// The target's own links are not merged into this page; it is crawled
    /// like any other frontier URL.
    async fn follow_refresh(&mut self, url: &str, fetch: &mut FetchResult, target: &str) -> u16 {
        tracing::debug!("Following meta refresh {} -> {}", url, target);
        let refreshed = self.corpus.fetch(target).await;
        fetch.mark_redirected(target);
        refreshed.status_code
    }

    pub fn analytics(&self) -> &AnalyticsState {
        &self.analytics
    }

    pub fn filter(&self) -> &TrapFilter {
        &self.filter
    }

    pub fn frontier(&self) -> &dyn Frontier {
        self.frontier.as_ref()
    }

    /// Snapshot of the run's analytics
    pub fn report(&self) -> AnalyticsReport {
        self.analytics.snapshot()
    }
}

/// True if both URLs name the same document once fragments are dropped
fn is_same_page(target: &str, page: &str) -> bool {
    match (parse_absolute(target), parse_absolute(page)) {
        (Ok(target), Ok(page)) => strip_fragment(&target) == strip_fragment(&page),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::crawler::frontier::MemoryFrontier;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Corpus serving fixed pages; unknown URLs fetch as 404
    #[derive(Default)]
    struct StaticCorpus {
        pages: HashMap<String, String>,
        moved: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticCorpus {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// Serves `to` when `from` is requested, as an HTTP redirect would
        fn with_move(mut self, from: &str, to: &str) -> Self {
            self.moved.insert(from.to_string(), to.to_string());
            self
        }
    }

    impl Corpus for StaticCorpus {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.requested.lock().unwrap().push(url.to_string());
            if let Some(to) = self.moved.get(url) {
                let html = self.pages.get(to).cloned().unwrap_or_default();
                return FetchResult::ok(url, html).redirected_to(to.as_str());
            }
            match self.pages.get(url) {
                Some(html) => FetchResult::ok(url, html.as_bytes()),
                None => FetchResult::new(url, 404),
            }
        }

        fn resolve_destination(&self, url: &str) -> Option<String> {
            Some(url.to_string())
        }
    }

    fn controller(corpus: StaticCorpus) -> Controller<StaticCorpus> {
        let filter = TrapFilter::new(".ics.uci.edu", FilterConfig::default());
        Controller::new(corpus, Box::new(MemoryFrontier::new()), filter)
    }

    #[tokio::test]
    async fn test_empty_frontier_is_done() {
        let mut controller = controller(StaticCorpus::default());

        assert_eq!(controller.state().unwrap(), CrawlState::Done);
        assert_eq!(controller.step().await.unwrap(), CrawlState::Done);
        assert!(controller.analytics().downloaded_urls().is_empty());
    }

    #[tokio::test]
    async fn test_step_enqueues_admitted_links() {
        let corpus = StaticCorpus::default().with_page(
            "http://www.ics.uci.edu/",
            r#"<a href="/a.html">a</a>
               <a href="/report.pdf">pdf</a>
               <a href="http://evil.com/">off</a>
               <a href="/a.html">again</a>"#,
        );
        let mut controller = controller(corpus);
        controller
            .seed(&["http://www.ics.uci.edu/".to_string()])
            .unwrap();

        assert_eq!(controller.step().await.unwrap(), CrawlState::Running);

        assert_eq!(controller.frontier().len().unwrap(), 1);
        // Both copies of /a.html passed the filter
        assert_eq!(controller.analytics().most_outlinks().count, 2);
        assert_eq!(
            controller.analytics().downloaded_urls(),
            ["http://www.ics.uci.edu/"]
        );
    }

    #[tokio::test]
    async fn test_failed_page_counts_as_download_only() {
        let mut controller = controller(StaticCorpus::default());
        controller
            .seed(&["http://www.ics.uci.edu/missing".to_string()])
            .unwrap();

        controller.run().await.unwrap();

        let report = controller.report();
        assert_eq!(report.downloaded_urls_count(), 1);
        assert!(report.subdomain_count.is_empty());
        assert_eq!(report.most_outlinks.url, None);
    }

    #[tokio::test]
    async fn test_max_pages_stops_crawl() {
        let corpus = StaticCorpus::default()
            .with_page("http://www.ics.uci.edu/", r#"<a href="/a">a</a><a href="/b">b</a>"#)
            .with_page("http://www.ics.uci.edu/a", "a")
            .with_page("http://www.ics.uci.edu/b", "b");
        let mut controller = controller(corpus).with_max_pages(2);
        controller
            .seed(&["http://www.ics.uci.edu/".to_string()])
            .unwrap();

        controller.run().await.unwrap();

        assert_eq!(controller.analytics().downloaded_urls().len(), 2);
        assert_eq!(controller.frontier().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_next_page() {
        let corpus = StaticCorpus::default().with_page("http://www.ics.uci.edu/", "x");
        let mut controller = controller(corpus);
        controller
            .seed(&["http://www.ics.uci.edu/".to_string()])
            .unwrap();

        controller.shutdown_handle().store(true, Ordering::SeqCst);
        controller.run().await.unwrap();

        assert!(controller.analytics().downloaded_urls().is_empty());
        assert_eq!(controller.frontier().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_meta_refresh_followed_and_scheduled() {
        let corpus = StaticCorpus::default()
            .with_page(
                "http://www.ics.uci.edu/old.html",
                r#"<meta http-equiv="refresh" content="0; url=/new.html">"#,
            )
            .with_page("http://www.ics.uci.edu/new.html", r#"<a href="/deep.html">d</a>"#);
        let mut controller = controller(corpus);
        controller
            .seed(&["http://www.ics.uci.edu/old.html".to_string()])
            .unwrap();

        controller.step().await.unwrap();

        let redirects = controller.analytics().redirects();
        assert_eq!(redirects.len(), 1);
        assert_eq!(redirects[0].to, "http://www.ics.uci.edu/new.html");
        assert_eq!(redirects[0].status_code, 200);
        assert_eq!(redirects[0].kind, RedirectKind::Refresh);

        // The target is queued but its links are not merged into the page
        assert_eq!(controller.frontier().len().unwrap(), 1);
        assert_eq!(controller.analytics().most_outlinks().count, 0);
        assert_eq!(
            *controller.corpus.requested.lock().unwrap(),
            vec![
                "http://www.ics.uci.edu/old.html".to_string(),
                "http://www.ics.uci.edu/new.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_to_same_page_not_followed() {
        let corpus = StaticCorpus::default().with_page(
            "http://www.ics.uci.edu/same.html",
            r#"<meta http-equiv="refresh" content="30; url=/same.html#top">
               <a href="/other.html">other</a>"#,
        );
        let mut controller = controller(corpus);
        controller
            .seed(&["http://www.ics.uci.edu/same.html".to_string()])
            .unwrap();

        controller.step().await.unwrap();

        assert!(controller.analytics().redirects().is_empty());
        assert_eq!(
            *controller.corpus.requested.lock().unwrap(),
            vec!["http://www.ics.uci.edu/same.html".to_string()]
        );
        assert_eq!(controller.analytics().most_outlinks().count, 1);
    }

    #[tokio::test]
    async fn test_http_redirect_recorded_from_fetch() {
        let corpus = StaticCorpus::default()
            .with_page("http://www.ics.uci.edu/new/", r#"<a href="child.html">c</a>"#)
            .with_move("http://www.ics.uci.edu/old/", "http://www.ics.uci.edu/new/");
        let mut controller = controller(corpus);
        controller
            .seed(&["http://www.ics.uci.edu/old/".to_string()])
            .unwrap();

        controller.step().await.unwrap();

        let redirects = controller.analytics().redirects();
        assert_eq!(redirects.len(), 1);
        assert_eq!(redirects[0].from, "http://www.ics.uci.edu/old/");
        assert_eq!(redirects[0].to, "http://www.ics.uci.edu/new/");
        assert_eq!(redirects[0].kind, RedirectKind::Http);
        // Links resolve against the page's final location
        assert_eq!(
            controller.analytics().most_outlinks().url.as_deref(),
            Some("http://www.ics.uci.edu/new/")
        );
        assert_eq!(controller.frontier().len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_offer_outcomes() {
        let mut controller = controller(StaticCorpus::default());

        assert_eq!(
            controller.offer("http://www.ics.uci.edu/a.html").unwrap(),
            Offer::Enqueued
        );
        assert_eq!(
            controller.offer("http://www.ics.uci.edu/a.html").unwrap(),
            Offer::Duplicate
        );
        assert!(matches!(
            controller.offer("http://evil.com/a.html").unwrap(),
            Offer::Rejected(RejectReason::OffDomain { .. })
        ));
    }
}
