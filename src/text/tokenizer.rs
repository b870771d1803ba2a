/// Splits text into lowercase word tokens
///
/// A token is a maximal run of ASCII alphanumeric characters. Any other
/// character, including every non-ASCII character, ends the current token.
/// Malformed or empty input simply yields fewer tokens; this never fails.
///
/// # Examples
///
/// ```
/// use weir::text::tokenize;
///
/// assert_eq!(tokenize("Research, research LAB!"), vec!["research", "research", "lab"]);
/// assert_eq!(tokenize("café"), vec!["caf"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            current.push(c.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Joins tokens back into space-separated text
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}
