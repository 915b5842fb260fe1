//! Text cleaning and URL validation for extracted fields.

use regex::Regex;
use url::Url;

/// Collapse whitespace and decode the five basic HTML entities.
///
/// `&amp;` is replaced first, so a double-encoded entity like
/// `&amp;lt;` decodes all the way to `<`.
pub fn clean_text(text: &str) -> String {
    let ws = Regex::new(r"\s+").expect("whitespace regex is valid");
    let collapsed = ws.replace_all(text, " ");

    collapsed
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// Return the URL unchanged when it parses with a scheme and host,
/// otherwise an empty string. Idempotent: validating a validated URL
/// returns the same value.
pub fn validate_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    match Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some() => url.to_string(),
        _ => String::new(),
    }
}
