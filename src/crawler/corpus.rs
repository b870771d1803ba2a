//! Corpus: the fetch layer the crawler consumes
//!
//! A [`Corpus`] turns a URL into a [`FetchResult`]. Failures never surface as
//! errors here; they are carried in the result's status code and left for the
//! extractor to classify.

use std::future::Future;

/// Result of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The URL that was requested
    pub url: String,

    /// Raw page body, if any was retrieved
    pub content: Option<Vec<u8>>,

    /// Declared character encoding label (e.g. "utf-8", "iso-8859-1")
    pub encoding: Option<String>,

    /// HTTP status code, or 0 when no response was received
    pub status_code: u16,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// True if the content was reached through a redirect
    pub is_redirected: bool,

    /// URL the content was finally served from, when redirected
    pub final_url: Option<String>,

    /// Transport failure description when no response was received
    pub error: Option<String>,
}

impl FetchResult {
    /// Creates a result with a status code and no content
    pub fn new(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            content: None,
            encoding: None,
            status_code,
            content_type: None,
            is_redirected: false,
            final_url: None,
            error: None,
        }
    }

    /// Creates a 200 result carrying a body
    pub fn ok(url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::new(url, 200)
        }
    }

    /// Creates a result for a fetch that never got a response
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(url, 0)
        }
    }

    /// Sets the Content-Type, taking the encoding from its charset if none is set
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if self.encoding.is_none() {
            self.encoding = charset_from_content_type(&content_type);
        }
        self.content_type = Some(content_type);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Marks the result as served from `final_url` after a redirect
    pub fn redirected_to(mut self, final_url: impl Into<String>) -> Self {
        self.mark_redirected(final_url);
        self
    }

    pub fn mark_redirected(&mut self, final_url: impl Into<String>) {
        self.is_redirected = true;
        self.final_url = Some(final_url.into());
    }

    /// True for 4xx/5xx responses
    pub fn is_hard_failure(&self) -> bool {
        self.status_code >= 400
    }

    /// URL the body was served from: the final URL if redirected, else the request URL
    pub fn effective_url(&self) -> &str {
        match (&self.final_url, self.is_redirected) {
            (Some(final_url), true) => final_url,
            _ => &self.url,
        }
    }
}

/// Extracts the charset parameter from a Content-Type header value
///
/// # Examples
///
/// ```
/// use weir::crawler::charset_from_content_type;
///
/// assert_eq!(
///     charset_from_content_type("text/html; charset=ISO-8859-1"),
///     Some("iso-8859-1".to_string())
/// );
/// assert_eq!(charset_from_content_type("text/html"), None);
/// ```
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').trim_matches('\'').to_lowercase())
        .filter(|value| !value.is_empty())
}

/// Source of fetched pages
pub trait Corpus {
    /// Fetches a URL
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;

    /// Identifier of where `url` would be fetched from
    ///
    /// `None` means the URL has no destination and should not be enqueued.
    fn resolve_destination(&self, url: &str) -> Option<String>;
}
