//! Scrape configuration with sensible defaults.
//!
//! [`ScrapeConfig`] controls request timeouts, the per-term result cap,
//! metadata caching, and transport behaviour. The defaults are tuned for
//! polite, reliable scraping of unknown sites.

use crate::error::ScrapeError;

/// Configuration for a scrape run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum number of raw results kept per search term before enrichment.
    pub max_results: usize,
    /// How long fetched page metadata is cached in seconds, keyed by URL.
    /// Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Force the HTTP/1.1-only transport backend for every request instead
    /// of using it only as the per-call fallback.
    pub http1_only: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_results: 50,
            cache_ttl_seconds: 600,
            user_agent: None,
            http1_only: false,
        }
    }
}

impl ScrapeConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `max_results` must be greater than 0
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.timeout_seconds == 0 {
            return Err(ScrapeError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(ScrapeError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
