use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute URL string
///
/// Any scheme is accepted here; scheme policy belongs to the admission filter.
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Returns a copy of the URL with its fragment removed
///
/// # Examples
///
/// ```
/// use url::Url;
/// use weir::url::strip_fragment;
///
/// let url = Url::parse("http://x.ics.uci.edu/a#section2").unwrap();
/// assert_eq!(strip_fragment(&url).as_str(), "http://x.ics.uci.edu/a");
/// ```
pub fn strip_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}

/// Returns true if `link` points back into `page` through a fragment only
///
/// The link must carry a non-empty fragment, and both URLs must be equal once
/// their fragments are removed.
pub fn is_self_fragment(link: &Url, page: &Url) -> bool {
    let has_fragment = link.fragment().is_some_and(|f| !f.is_empty());
    has_fragment && strip_fragment(link) == strip_fragment(page)
}
