//! Error types for the sitescout crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Heuristic misses (no matching elements, no
//! title found) are *not* errors; they degrade to empty fields.

/// Errors that can occur during discovery and scraping.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Invalid caller input: malformed target URL or bad search terms.
    /// Always raised before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An HTTP request to the target site failed (timeout, DNS, TLS,
    /// or error status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a response body (HTML or sitemap XML).
    #[error("parse error: {0}")]
    Parse(String),

    /// No search strategy could handle the analyzed website.
    #[error("no search strategy available: {0}")]
    NoStrategy(String),

    /// Invalid scrape configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Reading search terms or writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for sitescout results.
pub type Result<T> = std::result::Result<T, ScrapeError>;
