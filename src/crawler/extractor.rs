//! Link extraction from fetched pages
//!
//! This module turns one [`FetchResult`] into:
//! - the ordered outlink candidates of the page
//! - meta-refresh targets, which the controller follows separately
//! - analytics side effects: word histogram, longest page, subdomain count
//!   and self-fragment loops recorded as traps
//!
//! Link sources follow the HTML attributes that carry URLs (`a[href]`,
//! `img[src]`, `form[action]`, ...), visited in document order. A
//! `<base href>` changes the resolution base for every other reference.

use crate::analytics::AnalyticsState;
use crate::crawler::corpus::{charset_from_content_type, FetchResult};
use crate::text::tokenize;
use crate::url::{extract_host, is_self_fragment};
use encoding_rs::Encoding;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Elements and the attribute each one carries a URL in
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("area", "href"),
    ("link", "href"),
    ("img", "src"),
    ("script", "src"),
    ("iframe", "src"),
    ("frame", "src"),
    ("embed", "src"),
    ("source", "src"),
    ("audio", "src"),
    ("video", "src"),
    ("track", "src"),
    ("input", "src"),
    ("form", "action"),
    ("object", "data"),
    ("blockquote", "cite"),
    ("q", "cite"),
    ("ins", "cite"),
    ("del", "cite"),
];

/// Reference prefixes that never name a fetchable document
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Elements whose text is not page text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Page-level extraction failures
///
/// None of these stop a crawl: the page simply yields no links.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no response for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("no content for {url}")]
    NoContent { url: String },

    #[error("unknown encoding '{encoding}' for {url}")]
    UnknownEncoding { url: String, encoding: String },

    #[error("content of {url} is not valid {encoding}")]
    Decode { url: String, encoding: String },

    #[error("cannot parse page URL '{url}': {reason}")]
    Parse { url: String, reason: String },
}

/// How a discovered reference is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Normal outlink candidate
    Outlink,
    /// Points back into the source page through a fragment only
    FragmentLoop,
    /// Meta-refresh redirect target
    Refresh,
}

/// One reference discovered on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute form of the reference
    pub url: Url,
    /// Element the reference came from
    pub tag: &'static str,
    /// Attribute the reference came from
    pub attribute: &'static str,
    /// URL of the page the reference was found on
    pub source: String,
}

impl PageLink {
    pub fn is_refresh(&self) -> bool {
        self.tag == "meta"
    }

    /// Classifies the link relative to the page it was found on
    pub fn classify(&self, page: &Url) -> LinkKind {
        if self.is_refresh() {
            LinkKind::Refresh
        } else if is_self_fragment(&self.url, page) {
            LinkKind::FragmentLoop
        } else {
            LinkKind::Outlink
        }
    }
}

/// Links extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Normal outlink candidates in document order, not yet validated
    pub outlinks: Vec<String>,
    /// Meta-refresh targets in document order
    pub refreshes: Vec<String>,
    /// Number of word tokens on the page
    pub word_count: usize,
}

/// Extracts the outlinks of a fetched page and updates analytics
///
/// Fails without touching analytics if the fetch carries no usable content,
/// the content cannot be decoded, or the page URL cannot be parsed.
/// Otherwise the page's words, its hostname and any self-fragment loops are
/// recorded in `analytics`.
///
/// # Example
///
/// ```
/// use weir::analytics::AnalyticsState;
/// use weir::crawler::{extract_next_links, FetchResult};
///
/// let html = r#"<html><body><a href="/people">People</a></body></html>"#;
/// let fetch = FetchResult::ok("http://www.ics.uci.edu/", html);
/// let mut analytics = AnalyticsState::new(20);
///
/// let extraction = extract_next_links(&fetch, &mut analytics).unwrap();
/// assert_eq!(extraction.outlinks, vec!["http://www.ics.uci.edu/people"]);
/// ```
pub fn extract_next_links(
    fetch: &FetchResult,
    analytics: &mut AnalyticsState,
) -> Result<Extraction, ExtractError> {
    if let Some(reason) = &fetch.error {
        return Err(ExtractError::Fetch {
            url: fetch.url.clone(),
            reason: reason.clone(),
        });
    }

    if fetch.is_hard_failure() {
        return Err(ExtractError::HttpStatus {
            url: fetch.url.clone(),
            status: fetch.status_code,
        });
    }

    let text = decode_content(fetch)?;

    let page_url = Url::parse(fetch.effective_url()).map_err(|e| ExtractError::Parse {
        url: fetch.effective_url().to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(&text);
    let mut extraction = Extraction::default();

    for link in discover_links(&document, &page_url) {
        match link.classify(&page_url) {
            LinkKind::Refresh => extraction.refreshes.push(link.url.into()),
            LinkKind::FragmentLoop => {
                tracing::debug!("Self-fragment loop on {}: {}", link.source, link.url);
                analytics.traps.record_fragment_loop(link.url.as_str());
            }
            LinkKind::Outlink => extraction.outlinks.push(link.url.into()),
        }
    }

    let tokens = tokenize(&page_text(&document));
    extraction.word_count = tokens.len();
    analytics.record_page_words(page_url.as_str(), &tokens);

    if let Some(host) = extract_host(&page_url) {
        analytics.record_page_visit(&host);
    }

    Ok(extraction)
}

/// Decodes the body using the declared encoding
///
/// The label comes from the fetch's encoding, then from the Content-Type
/// charset, and defaults to UTF-8. Malformed input fails instead of being
/// replaced.
pub fn decode_content(fetch: &FetchResult) -> Result<String, ExtractError> {
    let content = match &fetch.content {
        Some(content) if !content.is_empty() => content,
        _ => {
            return Err(ExtractError::NoContent {
                url: fetch.url.clone(),
            })
        }
    };

    let label = fetch
        .encoding
        .clone()
        .or_else(|| {
            fetch
                .content_type
                .as_deref()
                .and_then(charset_from_content_type)
        })
        .unwrap_or_else(|| "utf-8".to_string());

    let encoding =
        Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            ExtractError::UnknownEncoding {
                url: fetch.url.clone(),
                encoding: label.clone(),
            }
        })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(content)
        .map(|text| text.into_owned())
        .ok_or_else(|| ExtractError::Decode {
            url: fetch.url.clone(),
            encoding: encoding.name().to_string(),
        })
}

/// Finds every URL reference in the document, in document order
///
/// References are resolved against the document's `<base href>` when
/// present, otherwise against `page_url`. Script, mail, phone and data
/// references are skipped, as are references that fail to resolve.
pub fn discover_links(document: &Html, page_url: &Url) -> Vec<PageLink> {
    let base = resolve_base(document, page_url);
    let mut links = Vec::new();

    let mut source = LINK_ATTRIBUTES
        .iter()
        .map(|(tag, attribute)| format!("{}[{}]", tag, attribute))
        .collect::<Vec<_>>();
    source.push("meta[http-equiv][content]".to_string());

    let Ok(selector) = Selector::parse(&source.join(", ")) else {
        return links;
    };

    for element in document.select(&selector) {
        let element = element.value();

        let (tag, attribute, reference) = if element.name() == "meta" {
            let is_refresh = element
                .attr("http-equiv")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"));
            let target = element.attr("content").and_then(parse_refresh_target);
            match target {
                Some(target) if is_refresh => ("meta", "content", target),
                _ => continue,
            }
        } else {
            let Some((tag, attribute)) = LINK_ATTRIBUTES
                .iter()
                .find(|(tag, _)| *tag == element.name())
            else {
                continue;
            };
            match element.attr(attribute) {
                Some(reference) => (*tag, *attribute, reference),
                None => continue,
            }
        };

        if let Some(url) = resolve_reference(reference, &base) {
            links.push(PageLink {
                url,
                tag,
                attribute,
                source: page_url.to_string(),
            });
        }
    }

    links
}

/// Resolution base: the first `<base href>` that resolves, else the page URL
fn resolve_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|base| base.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

/// Resolves one reference against the base, skipping non-document schemes
fn resolve_reference(reference: &str, base: &Url) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    let skipped = SKIPPED_SCHEMES.iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if skipped {
        return None;
    }

    base.join(reference).ok()
}

/// Parses the target of a meta refresh `content` value
///
/// Accepts `"<delay>; url=<target>"` with the `url=` prefix and quotes
/// optional. Returns `None` when the value carries only a delay.
///
/// # Examples
///
/// ```
/// use weir::crawler::parse_refresh_target;
///
/// assert_eq!(parse_refresh_target("0; URL='/moved.html'"), Some("/moved.html"));
/// assert_eq!(parse_refresh_target("5;http://www.ics.uci.edu/"), Some("http://www.ics.uci.edu/"));
/// assert_eq!(parse_refresh_target("30"), None);
/// ```
pub fn parse_refresh_target(content: &str) -> Option<&str> {
    let (_, rest) = content.split_once(|c: char| c == ';' || c == ',')?;
    let rest = rest.trim_start();

    let target = match rest.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("url") => rest[3..]
            .trim_start()
            .strip_prefix('=')
            .unwrap_or(rest),
        _ => rest,
    };

    let target = target.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

/// Concatenated text nodes of the document, excluding non-rendered elements
pub fn page_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_TEXT_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}
