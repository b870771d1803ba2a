use url::Url;

/// Extracts the hostname from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (e.g. `mailto:` or `file:` URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use weir::url::extract_host;
///
/// let url = Url::parse("http://vision.ics.uci.edu/path").unwrap();
/// assert_eq!(extract_host(&url), Some("vision.ics.uci.edu".to_string()));
///
/// let url = Url::parse("mailto:someone@uci.edu").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}
