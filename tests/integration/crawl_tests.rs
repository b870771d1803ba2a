//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! controller loop end-to-end.

use std::fs;
use tempfile::TempDir;
use weir::analytics::{AnalyticsState, RedirectKind};
use weir::config::{
    Config, CorpusConfig, CorpusMode, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig,
};
use weir::crawler::{
    crawl, extract_next_links, CacheCorpus, Controller, Corpus, FetchResult, HttpCorpus,
    MemoryFrontier,
};
use weir::filter::{RejectReason, TrapFilter};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Creates a config crawling the mock server's host
fn create_test_config(seeds: Vec<String>, frontier_path: Option<String>) -> Config {
    Config {
        crawler: CrawlerConfig {
            seeds,
            target_domain: "127.0.0.1".to_string(),
            max_pages: 0,
        },
        filter: FilterConfig::default(),
        corpus: CorpusConfig {
            mode: CorpusMode::Http,
            cache_dir: None,
            request_timeout_secs: 5,
        },
        user_agent: user_agent(),
        output: OutputConfig {
            report_path: "./test_report.txt".to_string(),
            frontier_path,
        },
    }
}

fn http_controller() -> Controller<HttpCorpus> {
    let corpus = HttpCorpus::new(&user_agent(), &CorpusConfig::default())
        .expect("Failed to build HTTP corpus");
    let filter = TrapFilter::new("127.0.0.1", FilterConfig::default());
    Controller::new(corpus, Box::new(MemoryFrontier::new()), filter)
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a small site: an index linking to two pages, a PDF, an
/// off-domain host and a calendar trap
async fn mount_site(server: &MockServer) {
    let base_url = server.uri();

    mount_html(
        server,
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/files/report.pdf">Report</a>
            <a href="http://evil.com/">Elsewhere</a>
            <a href="/calendar?week=2024-05-01">Calendar</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_html(
        server,
        "/page1",
        r#"<html><body>Research news <a href="/">Home</a></body></html>"#,
    )
    .await;

    mount_html(
        server,
        "/page2",
        r#"<html><body>Research labs and research groups</body></html>"#,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let mut controller = http_controller();
    controller.seed(&[format!("{}/", base_url)]).unwrap();
    controller.run().await.expect("Crawl failed");

    let report = controller.report();

    assert_eq!(
        report.downloaded_urls,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(report.subdomain_count.get("127.0.0.1"), Some(&3));

    // Only the calendar link is a trap; PDF and off-domain links are plain rejections
    assert_eq!(report.identified_traps_count(), 1);
    assert_eq!(
        report.identified_traps[0].url,
        format!("{}/calendar?week=2024-05-01", base_url)
    );
    assert!(matches!(
        report.identified_traps[0].reason,
        RejectReason::CalendarParameter { .. }
    ));

    assert_eq!(report.most_outlinks.url, Some(format!("{}/", base_url)));
    assert_eq!(report.most_outlinks.count, 2);
    assert_eq!(report.top_50_words[0], ("research".to_string(), 3));
}

#[test]
fn test_end_to_end_page_extraction() {
    let html = r##"<html><head><title>Dept</title></head><body>
        <p>Research Research Lab</p>
        <a href="/people.html">People</a>
        <a href="http://vision.ics.uci.edu/projects.html">Projects</a>
        <a href="http://www.example.com/elsewhere.html">Elsewhere</a>
        <a href="#the-lab">The top</a>
        </body></html>"##;
    let fetch = FetchResult::ok("http://dept.ics.uci.edu/index.html", html)
        .with_content_type("text/html");
    let mut analytics = AnalyticsState::new(20);

    let extraction = extract_next_links(&fetch, &mut analytics).unwrap();

    // The extractor keeps the off-domain link; the filter drops it
    assert_eq!(
        extraction.outlinks,
        vec![
            "http://dept.ics.uci.edu/people.html",
            "http://vision.ics.uci.edu/projects.html",
            "http://www.example.com/elsewhere.html",
        ]
    );

    let filter = TrapFilter::new(".ics.uci.edu", FilterConfig::default());
    let admitted: Vec<&String> = extraction
        .outlinks
        .iter()
        .filter(|url| filter.is_valid(url, &mut analytics.traps))
        .collect();
    assert_eq!(
        admitted,
        vec![
            "http://dept.ics.uci.edu/people.html",
            "http://vision.ics.uci.edu/projects.html",
        ]
    );

    let traps = analytics.traps.identified();
    assert_eq!(traps.len(), 1);
    assert_eq!(traps[0].url, "http://dept.ics.uci.edu/index.html#the-lab");
    assert_eq!(traps[0].reason, RejectReason::SelfFragmentLoop);

    assert_eq!(analytics.histogram().count("research"), 2);
    assert_eq!(analytics.histogram().count("lab"), 1);
    assert_eq!(analytics.histogram().count("the"), 0);
    assert_eq!(analytics.subdomains().get("dept.ics.uci.edu"), Some(&1));
}

#[tokio::test]
async fn test_error_pages_are_counted_but_not_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"<a href="/hidden">hidden</a>"#),
        )
        .mount(&mock_server)
        .await;

    let mut controller = http_controller();
    controller
        .seed(&[format!("{}/missing", base_url), format!("{}/broken", base_url)])
        .unwrap();
    controller.run().await.unwrap();

    let report = controller.report();
    assert_eq!(report.downloaded_urls_count(), 2);
    assert!(report.subdomain_count.is_empty());
    assert!(report.top_50_words.is_empty());
    assert_eq!(report.most_outlinks.count, 0);
}

#[tokio::test]
async fn test_http_redirect_records_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new/", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/new/", r#"<a href="child.html">child</a>"#).await;

    let corpus = HttpCorpus::new(&user_agent(), &CorpusConfig::default()).unwrap();
    let fetch = corpus.fetch(&format!("{}/old/", base_url)).await;

    assert_eq!(fetch.status_code, 200);
    assert!(fetch.is_redirected);
    assert_eq!(fetch.final_url, Some(format!("{}/new/", base_url)));
    assert_eq!(fetch.encoding.as_deref(), Some("utf-8"));

    let mut analytics = AnalyticsState::new(20);
    let extraction = extract_next_links(&fetch, &mut analytics).unwrap();
    assert_eq!(
        extraction.outlinks,
        vec![format!("{}/new/child.html", base_url)]
    );
}

#[tokio::test]
async fn test_declared_charset_is_used() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "Café lab" in ISO-8859-1, invalid as UTF-8
    let mut body = b"<html><body>Caf".to_vec();
    body.push(0xE9);
    body.extend_from_slice(b" lab <a href=\"/next\">next</a></body></html>");

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let corpus = HttpCorpus::new(&user_agent(), &CorpusConfig::default()).unwrap();
    let fetch = corpus.fetch(&format!("{}/latin1", base_url)).await;
    assert_eq!(fetch.encoding.as_deref(), Some("iso-8859-1"));

    let mut analytics = AnalyticsState::new(20);
    let extraction = extract_next_links(&fetch, &mut analytics).unwrap();

    assert_eq!(extraction.outlinks, vec![format!("{}/next", base_url)]);
    // Non-ASCII characters end a token
    assert_eq!(analytics.histogram().count("caf"), 1);
    assert_eq!(analytics.histogram().count("lab"), 1);
}

#[tokio::test]
async fn test_meta_refresh_target_fetched_and_crawled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/moved",
        r#"<html><head><meta http-equiv="refresh" content="0; url=/target"></head></html>"#,
    )
    .await;

    // Once when the refresh is followed, once when the frontier reaches it
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Landing</body></html>", "text/html"),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut controller = http_controller();
    controller.seed(&[format!("{}/moved", base_url)]).unwrap();
    controller.run().await.unwrap();

    let report = controller.report();
    assert_eq!(report.redirects.len(), 1);
    assert_eq!(report.redirects[0].from, format!("{}/moved", base_url));
    assert_eq!(report.redirects[0].to, format!("{}/target", base_url));
    assert_eq!(report.redirects[0].kind, RedirectKind::Refresh);
    assert_eq!(
        report.downloaded_urls,
        vec![format!("{}/moved", base_url), format!("{}/target", base_url)]
    );
}

#[tokio::test]
async fn test_crawl_resumes_persisted_frontier() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let dir = TempDir::new().unwrap();
    let frontier_path = dir.path().join("frontier.db").display().to_string();
    let mut config = create_test_config(vec![format!("{}/", base_url)], Some(frontier_path));

    // First run stops after the index page
    config.crawler.max_pages = 1;
    let report = crawl(&config, true).await.expect("First crawl failed");
    assert_eq!(report.downloaded_urls, vec![format!("{}/", base_url)]);

    // Second run picks up the queued pages; the seed is already known
    config.crawler.max_pages = 0;
    let report = crawl(&config, false).await.expect("Resumed crawl failed");
    assert_eq!(
        report.downloaded_urls,
        vec![format!("{}/page1", base_url), format!("{}/page2", base_url)]
    );

    // A fresh run starts over from the seed
    let report = crawl(&config, true).await.expect("Fresh crawl failed");
    assert_eq!(report.downloaded_urls_count(), 3);
}

#[tokio::test]
async fn test_cache_corpus_crawl_skips_uncached_links() {
    let dir = TempDir::new().unwrap();
    let corpus = CacheCorpus::new(dir.path());

    fs::write(
        corpus.path_for("http://www.ics.uci.edu/"),
        r#"<a href="/a.html">a</a> <a href="/b.html">b</a>"#,
    )
    .unwrap();
    fs::write(
        corpus.path_for("http://www.ics.uci.edu/a.html"),
        "<p>Cached page</p>",
    )
    .unwrap();

    let filter = TrapFilter::new(".ics.uci.edu", FilterConfig::default());
    let mut controller = Controller::new(corpus, Box::new(MemoryFrontier::new()), filter);
    controller
        .seed(&["http://www.ics.uci.edu/".to_string()])
        .unwrap();
    controller.run().await.unwrap();

    let report = controller.report();
    assert_eq!(
        report.downloaded_urls,
        vec!["http://www.ics.uci.edu/", "http://www.ics.uci.edu/a.html"]
    );
    // b.html passed the filter but has no cached copy
    assert_eq!(report.most_outlinks.count, 2);
}
