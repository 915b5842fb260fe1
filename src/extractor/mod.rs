//! Result enrichment: per-page metadata, text cleanup, quality scoring.

mod metadata;
mod quality;
mod text;

pub use metadata::{fetch_page_metadata, parse_page_metadata};
pub use quality::quality_score;
pub use text::{clean_text, validate_url};

use crate::config::ScrapeConfig;
use crate::http::HttpClient;
use crate::types::{EnrichedResult, PageMetadata, RawResult, SearchTerm, WebsiteInfo};
use chrono::Utc;
use moka::future::Cache;
use std::time::Duration;

/// Pause between successive per-result metadata fetches.
const RESULT_DELAY: Duration = Duration::from_millis(500);

/// Maximum number of cached page metadata entries.
const MAX_CACHE_ENTRIES: u64 = 500;

/// Enriches raw results one at a time, with a per-URL metadata cache.
pub struct DataExtractor {
    client: HttpClient,
    /// `None` when caching is disabled via `cache_ttl_seconds = 0`.
    cache: Option<Cache<String, PageMetadata>>,
}

impl DataExtractor {
    pub fn new(client: HttpClient, config: &ScrapeConfig) -> Self {
        let cache = (config.cache_ttl_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
                .build()
        });
        Self { client, cache }
    }

    /// Enrich a batch of raw results for one search term.
    ///
    /// Results are processed independently: a failure enriching one is
    /// recorded on that result and the batch continues. A fixed pause is
    /// inserted between successive results to throttle metadata fetches.
    pub async fn extract(
        &self,
        raw_results: Vec<RawResult>,
        term: &SearchTerm,
        _info: &WebsiteInfo,
    ) -> Vec<EnrichedResult> {
        tracing::info!(count = raw_results.len(), "extracting data from search results");

        let total = raw_results.len();
        let mut enriched_results = Vec::with_capacity(total);
        for (i, raw) in raw_results.into_iter().enumerate() {
            enriched_results.push(self.enrich_result(raw, term).await);
            if i < total - 1 {
                tokio::time::sleep(RESULT_DELAY).await;
            }
        }

        tracing::info!(count = enriched_results.len(), "enrichment finished");
        enriched_results
    }

    async fn enrich_result(&self, raw: RawResult, term: &SearchTerm) -> EnrichedResult {
        let mut enriched = EnrichedResult {
            url: raw.url,
            title: raw.title,
            description: raw.description,
            query: raw.query,
            source_url: raw.source_url,
            search_term_id: term.id.clone(),
            search_term_data: term.as_json(),
            extraction_timestamp: Utc::now(),
            metadata: PageMetadata::default(),
            data_quality_score: 0,
            metadata_error: None,
            error: None,
        };

        if !enriched.url.is_empty() {
            match self.page_metadata(&enriched.url).await {
                Ok(metadata) => enriched.metadata = metadata,
                Err(e) => {
                    tracing::debug!(url = enriched.url, error = %e, "metadata fetch failed");
                    enriched.metadata_error = Some(e.to_string());
                }
            }
        }

        enriched.title = enriched.title.map(|t| clean_text(&t)).filter(|t| !t.is_empty());
        enriched.description = enriched
            .description
            .map(|d| clean_text(&d))
            .filter(|d| !d.is_empty());
        enriched.metadata.page_title = enriched
            .metadata
            .page_title
            .map(|t| clean_text(&t))
            .filter(|t| !t.is_empty());
        enriched.metadata.page_description = enriched
            .metadata
            .page_description
            .map(|d| clean_text(&d))
            .filter(|d| !d.is_empty());
        enriched.url = validate_url(&enriched.url);

        enriched.data_quality_score = quality_score(&enriched);
        enriched
    }

    /// Metadata for one URL, consulting the cache first.
    async fn page_metadata(&self, url: &str) -> crate::error::Result<PageMetadata> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(url).await {
                tracing::debug!(url, "metadata cache hit");
                return Ok(hit);
            }
        }

        let metadata = fetch_page_metadata(&self.client, url).await?;
        if let Some(cache) = &self.cache {
            cache.insert(url.to_string(), metadata.clone()).await;
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ITEM_HTML: &str = r#"
        <html><head>
            <title>Rich Item &amp; Friends</title>
            <meta name="description" content="A described item">
        </head><body>
            <img src="/a.jpg"><a href="/other">other</a>
            <p>Some body content here.</p>
        </body></html>
    "#;

    fn term() -> SearchTerm {
        serde_json::from_value(json!({"id": 1, "query": "item"})).expect("valid term")
    }

    fn raw(url: &str) -> RawResult {
        RawResult {
            url: url.to_string(),
            title: Some("Raw &amp; Title".into()),
            description: None,
            query: "item".into(),
            source_url: "https://example.com/search".into(),
        }
    }

    fn extractor(ttl: u64) -> DataExtractor {
        let config = ScrapeConfig {
            cache_ttl_seconds: ttl,
            ..Default::default()
        };
        let client = HttpClient::new(&config).expect("client");
        DataExtractor::new(client, &config)
    }

    #[tokio::test]
    async fn enriches_with_page_metadata_and_cleans_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ITEM_HTML))
            .mount(&server)
            .await;

        let url = format!("{}/items/1", server.uri());
        let results = extractor(600)
            .extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.title.as_deref(), Some("Raw & Title"));
        assert_eq!(result.metadata.page_title.as_deref(), Some("Rich Item & Friends"));
        assert_eq!(result.metadata.page_description.as_deref(), Some("A described item"));
        assert_eq!(result.search_term_id, json!(1));
        assert_eq!(result.search_term_data["query"], json!("item"));
        assert!(result.metadata_error.is_none());
        assert!(result.data_quality_score > 0);
    }

    #[tokio::test]
    async fn metadata_failure_keeps_base_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = format!("{}/broken", server.uri());
        let results = extractor(600)
            .extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;

        let result = &results[0];
        assert_eq!(result.url, url);
        assert_eq!(result.title.as_deref(), Some("Raw & Title"));
        assert!(result
            .metadata_error
            .as_deref()
            .is_some_and(|e| e.contains("500")));
        // The no-error bonus is forfeited.
        assert!(result.data_quality_score < 100);
    }

    #[tokio::test]
    async fn repeated_urls_hit_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cached"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ITEM_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/cached", server.uri());
        let ex = extractor(600);
        let first = ex
            .extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;
        let second = ex
            .extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;

        assert_eq!(
            first[0].metadata.page_title,
            second[0].metadata.page_title
        );
        server.verify().await;
    }

    #[tokio::test]
    async fn zero_ttl_disables_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uncached"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ITEM_HTML))
            .expect(2)
            .mount(&server)
            .await;

        let url = format!("{}/uncached", server.uri());
        let ex = extractor(0);
        ex.extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;
        ex.extract(vec![raw(&url)], &term(), &WebsiteInfo::default())
            .await;
        server.verify().await;
    }

    #[tokio::test]
    async fn empty_url_skips_metadata_fetch() {
        let results = extractor(600)
            .extract(
                vec![RawResult {
                    url: String::new(),
                    title: Some("No URL".into()),
                    description: None,
                    query: "q".into(),
                    source_url: "https://example.com".into(),
                }],
                &term(),
                &WebsiteInfo::default(),
            )
            .await;

        let result = &results[0];
        assert!(result.url.is_empty());
        assert!(result.metadata_error.is_none());
        assert_eq!(result.metadata.page_content_length, 0);
    }
}
