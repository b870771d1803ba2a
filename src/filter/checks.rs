//! Individual admission heuristics
//!
//! Each check is a pure function over a URL (or its parts) so the filter
//! can run them in a fixed order and stop at the first match.

use crate::url::QueryParams;
use url::Url;

/// Positional difference score between two URL strings
///
/// Counts characters that differ at aligned positions up to the shorter
/// length, then adds the length difference. Insertions shift alignment, so
/// the score is not an edit distance.
///
/// # Examples
///
/// ```
/// use weir::filter::similarity_score;
///
/// assert_eq!(similarity_score("abcd", "abcd"), 0);
/// assert_eq!(similarity_score("abcd", "abXd"), 1);
/// assert_eq!(similarity_score("abcd", "abcdef"), 2);
/// ```
pub fn similarity_score(a: &str, b: &str) -> usize {
    let mut a_len = 0usize;
    let mut b_len = 0usize;
    let mut differing = 0usize;

    let mut a_chars = a.chars();
    let mut b_chars = b.chars();
    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some(x), Some(y)) => {
                a_len += 1;
                b_len += 1;
                if x != y {
                    differing += 1;
                }
            }
            (Some(_), None) => a_len += 1,
            (None, Some(_)) => b_len += 1,
            (None, None) => break,
        }
    }

    differing + a_len.abs_diff(b_len)
}

/// First non-empty path segment that occurs more than once
pub fn repeated_path_segment(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();

    segments
        .iter()
        .enumerate()
        .find(|(i, segment)| segments[..*i].contains(segment))
        .map(|(_, segment)| segment.to_string())
}

/// First query parameter whose name contains one of the calendar markers
///
/// Comparison is case-insensitive; markers are expected in lowercase.
pub fn calendar_parameter(params: &QueryParams, markers: &[String]) -> Option<String> {
    params
        .names()
        .find(|name| {
            let lowered = name.to_lowercase();
            markers
                .iter()
                .any(|marker| lowered.contains(&marker.to_lowercase()))
        })
        .map(str::to_string)
}
