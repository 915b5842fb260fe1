//! Core data types shared across analysis, search, and extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder value stored in [`WebsiteInfo::search_params`] for the
/// parameter that carries the search query. Strategies substitute the
/// actual query for this value at request time.
pub const SEARCH_TERM_PLACEHOLDER: &str = "SEARCH_TERM";

/// Everything learned about a website from its homepage and well-known
/// paths. Built once by the analyzer, then read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebsiteInfo {
    /// Target URL as given by the caller.
    pub url: String,
    /// Host portion of the target URL.
    pub domain: String,
    /// Strategy chosen for this site, filled in after selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_strategy: Option<crate::strategy::StrategyKind>,
    /// Absolute URLs that accept search requests (form actions or the
    /// page itself).
    pub search_endpoints: Vec<String>,
    /// Sitemap URLs found via well-known paths and robots.txt, unioned.
    pub sitemap_urls: Vec<String>,
    /// Whether a search form was detected on the homepage.
    pub has_search_form: bool,
    /// Query parameters to send when searching. Values are either the
    /// `SEARCH_TERM` placeholder or fixed literals (e.g. hidden inputs).
    pub search_params: BTreeMap<String, String>,
    /// Heuristic guess that the site renders content with JavaScript.
    pub requires_js: bool,
    /// Raw robots.txt body, when one was fetched successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots_txt: Option<String>,
    /// Homepage meta tags.
    pub meta_info: MetaInfo,
    /// All forms found on the homepage.
    pub forms: Vec<FormInfo>,
    /// Search-related links found on the homepage.
    pub links: Vec<LinkInfo>,
    /// Inputs inside detected search forms.
    pub search_inputs: Vec<SearchInput>,
    /// HTTP methods of detected search forms (lowercase).
    pub form_methods: Vec<String>,
    /// Set when the homepage itself could not be fetched; the remaining
    /// fields hold whatever partial information was gathered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Homepage meta tags of interest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// A form element found on the analyzed page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInfo {
    /// Raw `action` attribute, possibly relative or empty.
    pub action: String,
    /// HTTP method, lowercase, defaulting to `get`.
    pub method: String,
    /// Input names inside the form.
    pub inputs: Vec<String>,
}

/// A search-related link found on the analyzed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkInfo {
    pub href: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// An input element inside a detected search form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInput {
    /// Input `name` attribute, defaulting to `q` when absent.
    pub name: String,
    /// Input `type` attribute, defaulting to `text`.
    pub input_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One search term from the caller's batch.
///
/// Only `id` is required; every other field is carried through untouched
/// into the matching results. A term is usable iff it yields a non-empty
/// query via [`SearchTerm::build_query`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTerm {
    /// Caller-supplied identifier, number or string.
    pub id: serde_json::Value,
    /// All remaining fields, preserved in input order.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl SearchTerm {
    /// Build the query string for this term.
    ///
    /// `Artist` and `Title` are preferred, joined with a space in that
    /// order. When neither is present, all non-empty string fields are
    /// joined with spaces in input order.
    pub fn build_query(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(artist) = self.string_field("Artist") {
            parts.push(artist);
        }
        if let Some(title) = self.string_field("Title") {
            parts.push(title);
        }

        if parts.is_empty() {
            parts = self
                .fields
                .iter()
                .filter_map(|(_, v)| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        parts.join(" ")
    }

    fn string_field(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// The full term record as a JSON object, for embedding in results.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// One candidate result extracted from a search response, before
/// enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResult {
    /// Absolute result URL.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Query that produced this result.
    pub query: String,
    /// URL of the search response it was extracted from.
    pub source_url: String,
}

/// Metadata fetched from a result page itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_modified_date: Option<String>,
    /// Absolute image URLs from the page, capped at 10.
    pub page_images: Vec<String>,
    /// Absolute link URLs from the page, capped at 20.
    pub page_links: Vec<String>,
    /// Length of the page's visible text.
    pub page_content_length: usize,
}

/// A fully enriched result record, never mutated after extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub query: String,
    pub source_url: String,
    /// Identifier of the term that produced this result.
    pub search_term_id: serde_json::Value,
    /// The full term record, carried through for downstream matching.
    pub search_term_data: serde_json::Value,
    pub extraction_timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: PageMetadata,
    /// Completeness score in `[0, 100]`.
    pub data_quality_score: u8,
    /// Set when metadata could not be fetched for this result; the base
    /// fields are still populated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
    /// Set when enrichment itself failed partway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One entry in the report's results list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultEntry {
    Enriched(Box<EnrichedResult>),
    /// Record for a term whose search failed entirely. `search_term`
    /// carries the full term record.
    TermFailure {
        search_term_id: serde_json::Value,
        search_term: serde_json::Value,
        error: String,
        results_count: usize,
    },
}

/// Report-level metadata about the scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub target_url: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_strategy: Option<crate::strategy::StrategyKind>,
    pub timestamp: DateTime<Utc>,
    pub total_search_terms: usize,
    pub website_info: WebsiteInfo,
}

/// The complete output of a scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub metadata: ReportMetadata,
    pub results: Vec<ResultEntry>,
    /// Set when the run failed before any term could be searched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
