//! The orchestrating engine: discover, select a strategy, then search
//! and enrich term by term.
//!
//! Execution is strictly sequential with a fixed pause between terms.
//! Per-term failures become [`ResultEntry::TermFailure`] records and the
//! batch continues; only invalid input aborts the run.

use crate::analyzer::analyze_website;
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::extractor::DataExtractor;
use crate::http::HttpClient;
use crate::strategy::{run_search, select_strategy};
use crate::types::{ReportMetadata, ResultEntry, ScrapeReport, SearchTerm};
use crate::validate::{validate_search_terms, validate_target_url};
use chrono::Utc;
use std::time::Duration;

/// Pause between successive search terms.
const TERM_DELAY: Duration = Duration::from_secs(1);

/// Coordinates one scrape run against one website.
pub struct ScraperEngine {
    config: ScrapeConfig,
    client: HttpClient,
    extractor: DataExtractor,
}

impl ScraperEngine {
    /// Build an engine from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScrapeError::Config`] for an invalid
    /// configuration or [`crate::error::ScrapeError::Http`] if the HTTP
    /// client cannot be built.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::new(&config)?;
        let extractor = DataExtractor::new(client.clone(), &config);
        Ok(Self {
            config,
            client,
            extractor,
        })
    }

    /// Run the full pipeline for one target URL and term batch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScrapeError::InvalidInput`] before any
    /// network activity when the URL or terms are malformed. Everything
    /// downstream is contained in the report.
    pub async fn scrape(&self, url: &str, terms: &[SearchTerm]) -> Result<ScrapeReport> {
        let domain = validate_target_url(url)?;
        validate_search_terms(terms)?;

        let mut info = analyze_website(url, &self.client).await;
        let strategy = select_strategy(&info);
        info.search_strategy = strategy;
        tracing::info!(strategy = ?strategy, "strategy selected");

        let mut report = ScrapeReport {
            metadata: ReportMetadata {
                target_url: url.to_string(),
                domain,
                search_strategy: strategy,
                timestamp: Utc::now(),
                total_search_terms: terms.len(),
                website_info: info.clone(),
            },
            results: Vec::new(),
            error: None,
        };

        let Some(kind) = strategy else {
            tracing::error!("no suitable search strategy found");
            report.error = Some("no suitable search strategy found".into());
            return Ok(report);
        };

        for (i, term) in terms.iter().enumerate() {
            let query = term.build_query();
            tracing::info!(
                term = i + 1,
                total = terms.len(),
                query,
                "processing search term"
            );

            match run_search(kind, url, &query, &info, &self.client).await {
                Ok(mut raw_results) => {
                    raw_results.truncate(self.config.max_results);
                    let enriched = self.extractor.extract(raw_results, term, &info).await;
                    tracing::info!(count = enriched.len(), "term finished");
                    report.results.extend(
                        enriched
                            .into_iter()
                            .map(|e| ResultEntry::Enriched(Box::new(e))),
                    );
                }
                Err(e) => {
                    tracing::error!(term = i + 1, error = %e, "search term failed");
                    report.results.push(ResultEntry::TermFailure {
                        search_term_id: term.id.clone(),
                        search_term: term.as_json(),
                        error: e.to_string(),
                        results_count: 0,
                    });
                }
            }

            if i < terms.len() - 1 {
                tokio::time::sleep(TERM_DELAY).await;
            }
        }

        tracing::info!(total = report.results.len(), "scrape complete");
        Ok(report)
    }
}
