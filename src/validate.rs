//! Input validation, run before any network activity.

use crate::error::{Result, ScrapeError};
use crate::types::SearchTerm;
use url::Url;

/// Fields that make a search term usable.
const QUERY_FIELDS: &[&str] = &["Artist", "Title", "query", "search", "term"];

/// Validate the target URL: must be absolute, http or https, with a host.
///
/// Returns the host string for use as the report domain.
pub fn validate_target_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput("URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ScrapeError::InvalidInput(format!("invalid URL '{trimmed}': {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScrapeError::InvalidInput(format!(
                "unsupported URL scheme '{other}': only http and https are allowed"
            )));
        }
    }

    url.host_str()
        .map(String::from)
        .ok_or_else(|| ScrapeError::InvalidInput(format!("URL '{trimmed}' has no host")))
}

/// Validate the search-term batch.
///
/// The batch must be non-empty and every term must carry at least one
/// non-empty string among the recognized query fields.
pub fn validate_search_terms(terms: &[SearchTerm]) -> Result<()> {
    if terms.is_empty() {
        return Err(ScrapeError::InvalidInput(
            "search terms list cannot be empty".into(),
        ));
    }

    for (index, term) in terms.iter().enumerate() {
        let usable = QUERY_FIELDS.iter().any(|field| {
            term.fields
                .get(*field)
                .and_then(|v| v.as_str())
                .is_some_and(|s| !s.trim().is_empty())
        });
        if !usable {
            return Err(ScrapeError::InvalidInput(format!(
                "search term at index {index} (id {}) has no usable query field \
                 (expected one of {QUERY_FIELDS:?})",
                term.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn term(value: serde_json::Value) -> SearchTerm {
        serde_json::from_value(value).expect("valid term")
    }

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            validate_target_url("https://example.com/path").expect("valid"),
            "example.com"
        );
        assert_eq!(
            validate_target_url("http://sub.example.org").expect("valid"),
            "sub.example.org"
        );
    }

    #[test]
    fn rejects_empty_url() {
        let err = validate_target_url("  ").expect_err("should fail");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let err = validate_target_url("ftp://example.com").expect_err("should fail");
        assert!(err.to_string().contains("ftp"));
        assert!(validate_target_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn rejects_relative_url() {
        assert!(validate_target_url("example.com/search").is_err());
    }

    #[test]
    fn rejects_empty_terms_list() {
        let err = validate_search_terms(&[]).expect_err("should fail");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn accepts_terms_with_query_fields() {
        let terms = vec![
            term(json!({"id": 1, "Artist": "Beyonce", "Title": "Single Ladies"})),
            term(json!({"id": 2, "query": "rust"})),
            term(json!({"id": "x", "term": "tokio"})),
        ];
        assert!(validate_search_terms(&terms).is_ok());
    }

    #[test]
    fn rejects_term_without_query_fields() {
        let terms = vec![
            term(json!({"id": 1, "query": "fine"})),
            term(json!({"id": 2, "count": 3})),
        ];
        let err = validate_search_terms(&terms).expect_err("should fail");
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn rejects_term_with_blank_query_field() {
        let terms = vec![term(json!({"id": 1, "query": "   "}))];
        assert!(validate_search_terms(&terms).is_err());
    }
}
