//! HTTP client with User-Agent rotation and a dual transport backend.
//!
//! Wraps two [`reqwest::Client`] instances: the default client and an
//! HTTP/1.1-only fallback for sites that reject HTTP/2. When the default
//! transport fails with a protocol-looking error, the request is retried
//! once on the fallback backend for that call only.
//!
//! TLS certificate verification is disabled since the scraper targets
//! arbitrary sites, many of which carry broken certificate chains.

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated at client construction.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Maximum redirects followed per request.
const MAX_REDIRECTS: usize = 5;

/// Response from an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (empty for HEAD).
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared HTTP client for the whole scrape run.
///
/// Cheap to clone: the underlying connection pools are shared, so every
/// component reuses one session.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    /// HTTP/1.1-only fallback client.
    h1_client: reqwest::Client,
    /// When set, every request goes straight to the fallback backend.
    http1_only: bool,
}

impl HttpClient {
    /// Build a client pair from the scrape configuration.
    ///
    /// Both clients share the timeout, redirect policy, cookie store, and
    /// User-Agent (custom if configured, otherwise randomly rotated).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if a client cannot be constructed.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let ua = match config.user_agent {
            Some(ref custom) => custom.clone(),
            None => random_user_agent().to_owned(),
        };

        let client = base_builder(config.timeout_seconds, &ua)
            .build()
            .map_err(|e| ScrapeError::Http(format!("failed to build HTTP client: {e}")))?;

        let h1_client = base_builder(config.timeout_seconds, &ua)
            .http1_only()
            .build()
            .map_err(|e| ScrapeError::Http(format!("failed to build HTTP/1.1 client: {e}")))?;

        Ok(Self {
            client,
            h1_client,
            http1_only: config.http1_only,
        })
    }

    /// Perform a GET request with optional query parameters.
    ///
    /// Falls back to the HTTP/1.1-only backend when the default transport
    /// fails with a protocol-looking error (some CDNs reject HTTP/2).
    ///
    /// Non-2xx statuses are *not* errors here; callers inspect
    /// [`HttpResponse::status`].
    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, ScrapeError> {
        if self.http1_only {
            return self.get_inner(&self.h1_client, url, params).await;
        }
        match self.get_inner(&self.client, url, params).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                if is_protocol_error(&e) {
                    tracing::debug!(url, error = %e, "retrying on HTTP/1.1 backend");
                    self.get_inner(&self.h1_client, url, params).await
                } else {
                    Err(e)
                }
            }
        }
    }

    async fn get_inner(
        &self,
        client: &reqwest::Client,
        url: &str,
        params: &[(String, String)],
    ) -> Result<HttpResponse, ScrapeError> {
        let mut request = client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ScrapeError::Http(format!("GET {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// POST url-encoded form data.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, ScrapeError> {
        let client = if self.http1_only {
            &self.h1_client
        } else {
            &self.client
        };

        let response = client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| ScrapeError::Http(format!("POST {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }

    /// Perform a HEAD request and return the status code.
    pub async fn head(&self, url: &str) -> Result<u16, ScrapeError> {
        let client = if self.http1_only {
            &self.h1_client
        } else {
            &self.client
        };

        let response = client
            .head(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Http(format!("HEAD {url} failed: {e}")))?;

        Ok(response.status().as_u16())
    }
}

/// Common builder settings for both transport backends.
fn base_builder(timeout_seconds: u64, user_agent: &str) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(true)
}

/// Heuristic: does this error look like an HTTP protocol mismatch worth
/// retrying on the HTTP/1.1 backend?
fn is_protocol_error(err: &ScrapeError) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("http2") || msg.contains("protocol") || msg.contains("connection closed")
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
}
