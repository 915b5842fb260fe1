//! The shared result-extraction heuristic.
//!
//! All strategies that scrape an HTML response use this single extractor.
//! Candidate elements are found by trying ordered, named selector groups;
//! the first group with any matches wins. When no group matches, the
//! extractor falls back to content-rich anchor elements.

use crate::error::{Result, ScrapeError};
use crate::heuristics::dedup_by_url;
use crate::types::RawResult;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Ordered class-pattern groups for result container detection. The
/// first group with any matching elements supplies the candidate set.
const SELECTOR_GROUPS: &[(&str, &str)] = &[
    ("result containers", r"(?i)result|item|entry|post|article"),
    ("media containers", r"(?i)mixtape|album|artist|track|song"),
    ("content containers", r"(?i)content|main|search"),
    ("layout containers", r"(?i)row|grid|column|card"),
];

/// URL substrings that disqualify a candidate result.
const SKIP_PATTERNS: &[&str] = &[
    "#",
    "javascript:",
    "mailto:",
    "tel:",
    "data:",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "login",
    "register",
    "signup",
    "signin",
];

/// Href substrings that mark an anchor as navigation or social, for the
/// content-rich link fallback.
const NAV_HREF_PATTERNS: &[&str] = &[
    "#",
    "javascript:",
    "mailto:",
    "tel:",
    "facebook",
    "twitter",
    "instagram",
    "youtube",
];

/// Path segments that mark an anchor as pointing at content.
const CONTENT_PATH_SEGMENTS: &[&str] = &[
    "/artist/", "/album/", "/mixtape/", "/track/", "/song/", "/article/", "/post/", "/item/",
];

/// Link-text words that mark an anchor as site navigation.
const NAV_TEXT_WORDS: &[&str] = &["home", "about", "contact", "login", "register"];

/// Phrases whose presence in page text marks it as a search results page.
const RESULTS_PAGE_PHRASES: &[&str] = &[
    "results found",
    "search results",
    "no results",
    "found 0 results",
    "your search for",
    "showing results for",
];

/// Extract candidate results from a search response body.
///
/// Returns valid, URL-deduplicated results in encounter order. Heuristic
/// misses produce an empty vector, not an error.
pub fn extract_results(html: &str, base_url: &str, query: &str) -> Result<Vec<RawResult>> {
    let document = Html::parse_document(html);

    let class_sel = Selector::parse("[class]")
        .map_err(|e| ScrapeError::Parse(format!("invalid class selector: {e:?}")))?;
    let anchor_sel = Selector::parse("a[href]")
        .map_err(|e| ScrapeError::Parse(format!("invalid anchor selector: {e:?}")))?;

    let mut candidates: Vec<ElementRef<'_>> = Vec::new();
    for (group_name, pattern) in SELECTOR_GROUPS {
        let re = Regex::new(pattern).expect("selector group regex is valid");
        let matched: Vec<ElementRef<'_>> = document
            .select(&class_sel)
            .filter(|el| el.value().attr("class").is_some_and(|c| re.is_match(c)))
            .collect();
        if !matched.is_empty() {
            tracing::debug!(
                group = group_name,
                count = matched.len(),
                "result containers matched"
            );
            candidates = matched;
            break;
        }
    }

    if candidates.is_empty() {
        candidates = document
            .select(&anchor_sel)
            .filter(|a| is_content_rich_anchor(a))
            .collect();
        tracing::debug!(count = candidates.len(), "using content-rich links as results");
    }

    let mut results = Vec::new();
    for element in candidates {
        if let Some(result) = extract_candidate(&element, base_url, query, &anchor_sel) {
            if is_valid_result(&result) {
                results.push(result);
            }
        }
    }

    Ok(dedup_by_url(results))
}

/// Check whether a response body looks like a search results page.
pub fn is_results_page(html: &str) -> bool {
    let document = Html::parse_document(html);
    let text: String = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    RESULTS_PAGE_PHRASES
        .iter()
        .any(|phrase| text.contains(phrase))
}

/// Navigation/social anchors are skipped; the rest qualify when they
/// point at a content path or carry substantial non-navigation text.
fn is_content_rich_anchor(anchor: &ElementRef<'_>) -> bool {
    let href = anchor.value().attr("href").unwrap_or("").to_lowercase();
    if NAV_HREF_PATTERNS.iter().any(|p| href.contains(p)) {
        return false;
    }

    if CONTENT_PATH_SEGMENTS.iter().any(|seg| href.contains(seg)) {
        return true;
    }

    let text = element_text(anchor);
    text.len() > 10
        && !NAV_TEXT_WORDS
            .iter()
            .any(|nav| text.to_lowercase().contains(nav))
}

/// Pull {url, title, description} out of one candidate element with the
/// fallback chains documented on each step. Returns `None` when no URL
/// can be resolved.
fn extract_candidate(
    element: &ElementRef<'_>,
    base_url: &str,
    query: &str,
    anchor_sel: &Selector,
) -> Option<RawResult> {
    let base = Url::parse(base_url).ok()?;

    // URL: the element itself if it is a link, else the first nested link.
    let href = if element.value().name() == "a" {
        element.value().attr("href")
    } else {
        element
            .select(anchor_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
    }?;
    let url = base.join(href).ok()?.to_string();

    // Title: heading, then anchor text, then title attribute, then an
    // element with a title-like class.
    let mut title = first_text(element, "h1, h2, h3, h4, h5, h6");
    if title.is_empty() {
        title = if element.value().name() == "a" {
            element_text(element)
        } else {
            element
                .select(anchor_sel)
                .next()
                .map(|a| element_text(&a))
                .unwrap_or_default()
        };
    }
    if title.is_empty() {
        title = element
            .value()
            .attr("title")
            .or_else(|| {
                element
                    .select(anchor_sel)
                    .next()
                    .and_then(|a| a.value().attr("title"))
            })
            .unwrap_or("")
            .trim()
            .to_string();
    }
    if title.is_empty() {
        title = first_text_with_class(element, "span, div, p", r"(?i)title|name|heading");
    }

    // Description: description-like class, then a paragraph, then a
    // substantial span/div, then the element's own text.
    let mut description =
        first_text_with_class(element, "p, span, div", r"(?i)desc|summary|excerpt|content|text");
    if description.is_empty() {
        description = first_text(element, "p");
    }
    if description.is_empty() {
        description = substantial_text(element, "span, div");
    }
    if description.is_empty() {
        let own = element_text(element);
        if own.len() > 20 && own != title {
            description = own;
        }
    }

    Some(RawResult {
        url,
        title: non_empty(title),
        description: non_empty(description),
        query: query.to_string(),
        source_url: base_url.to_string(),
    })
}

/// A result must have a non-blocklisted URL and a title or description;
/// titles under 3 characters are rejected as likely navigation.
fn is_valid_result(result: &RawResult) -> bool {
    if result.url.is_empty() {
        return false;
    }
    let lower = result.url.to_lowercase();
    if SKIP_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }
    let title = result.title.as_deref().unwrap_or("");
    if title.is_empty() && result.description.is_none() {
        return false;
    }
    if !title.is_empty() && title.trim().len() < 3 {
        return false;
    }
    true
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first descendant matching `selector`, or empty.
fn first_text(element: &ElementRef<'_>, selector: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    element
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

/// Text of the first descendant matching `selector` whose class attribute
/// matches `class_pattern`, or empty.
fn first_text_with_class(element: &ElementRef<'_>, selector: &str, class_pattern: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    let re = Regex::new(class_pattern).expect("class pattern regex is valid");
    element
        .select(&sel)
        .find(|el| el.value().attr("class").is_some_and(|c| re.is_match(c)))
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

/// Text of the first descendant matching `selector` with at least 20
/// characters of text, or empty.
fn substantial_text(element: &ElementRef<'_>, selector: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    element
        .select(&sel)
        .map(|el| element_text(&el))
        .find(|text| text.len() >= 20)
        .unwrap_or_default()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
