//! Live HTTP corpus
//!
//! Fetches pages over the network with `reqwest`. Redirects are followed up
//! to 10 hops; the final URL is recorded on the result. Transport errors are
//! reported in the result rather than returned.

use crate::config::{CorpusConfig, UserAgentConfig};
use crate::crawler::corpus::{Corpus, FetchResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per request
pub const MAX_REDIRECTS: usize = 10;

/// Formats the crawler's user agent string
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use weir::config::UserAgentConfig;
/// use weir::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "weir".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Corpus backed by live HTTP requests
#[derive(Debug, Clone)]
pub struct HttpCorpus {
    client: Client,
}

impl HttpCorpus {
    /// Builds a corpus with a client configured from the crawler settings
    pub fn new(
        user_agent: &UserAgentConfig,
        corpus: &CorpusConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(corpus.request_timeout_secs),
        )?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Corpus for HttpCorpus {
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else if e.is_redirect() {
                    format!("Too many redirects (max {})", MAX_REDIRECTS)
                } else {
                    e.to_string()
                };
                tracing::warn!("Fetch failed for {}: {}", url, reason);
                return FetchResult::failed(url, reason);
            }
        };

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();
        let redirected = Url::parse(url).map_or(true, |requested| requested != final_url);

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut result = match response.bytes().await {
            Ok(body) => FetchResult {
                content: Some(body.to_vec()),
                ..FetchResult::new(url, status_code)
            },
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                FetchResult::new(url, status_code)
            }
        };

        if let Some(content_type) = content_type {
            result = result.with_content_type(content_type);
        }

        if redirected {
            tracing::debug!("{} redirected to {}", url, final_url);
            result.mark_redirected(final_url.as_str());
        }

        result
    }

    /// Any http(s) URL is its own destination
    fn resolve_destination(&self, url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .filter(|u| u.scheme() == "http" || u.scheme() == "https")
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent_string(&create_test_config()),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_resolve_destination() {
        let corpus = HttpCorpus::new(&create_test_config(), &CorpusConfig::default()).unwrap();

        assert_eq!(
            corpus.resolve_destination("http://www.ics.uci.edu/a"),
            Some("http://www.ics.uci.edu/a".to_string())
        );
        assert_eq!(corpus.resolve_destination("ftp://www.ics.uci.edu/a"), None);
        assert_eq!(corpus.resolve_destination("not a url"), None);
    }

    // Live fetch behavior is covered by the wiremock tests in tests/integration
}
