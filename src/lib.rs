//! # sitescout
//!
//! Zero-configuration website search scraping.
//!
//! Point sitescout at any website and a batch of search terms; it works
//! out how to search the site on its own, with no site-specific selectors,
//! no API keys, no per-site setup.
//!
//! ## Design
//!
//! - Analyzes the homepage to find search forms, sitemaps, and
//!   JavaScript requirements
//! - Picks one strategy from a fixed priority list: search form, then
//!   sitemap scan, then query-parameter probing (which always applies)
//! - Extracts results with ordered CSS-selector heuristics shared by
//!   all strategies
//! - Enriches each result with metadata from the result page itself and
//!   a deterministic 0-100 quality score
//! - Strictly sequential requests with fixed pauses, rotating
//!   User-Agents, and an in-memory per-URL metadata cache
//!
//! Failures are contained at the smallest scope: one bad endpoint,
//! result, or term never sinks the batch.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod heuristics;
pub mod http;
pub mod scraper_engine;
pub mod strategies;
pub mod strategy;
pub mod types;
pub mod validate;

pub use config::ScrapeConfig;
pub use error::{Result, ScrapeError};
pub use scraper_engine::ScraperEngine;
pub use strategy::{SearchStrategyTrait, StrategyKind};
pub use types::{EnrichedResult, RawResult, ResultEntry, ScrapeReport, SearchTerm, WebsiteInfo};

/// Scrape a website for a batch of search terms.
///
/// Analyzes the site, selects a search strategy, then searches and
/// enriches results term by term, returning the assembled report.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidInput`] for a malformed URL or term
/// batch and [`ScrapeError::Config`] for an invalid configuration, both
/// before any network activity. Network and parsing failures during the
/// run are recorded inside the report instead.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sitescout::Result<()> {
/// let terms: Vec<sitescout::SearchTerm> = serde_json::from_str(
///     r#"[{"id": 1, "Artist": "Beyonce", "Title": "Single Ladies"}]"#,
/// ).expect("valid terms");
/// let config = sitescout::ScrapeConfig::default();
/// let report = sitescout::scrape("https://example.com", &terms, &config).await?;
/// println!("{} results", report.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(
    url: &str,
    terms: &[SearchTerm],
    config: &ScrapeConfig,
) -> Result<ScrapeReport> {
    let engine = ScraperEngine::new(config.clone())?;
    engine.scrape(url, terms).await
}
