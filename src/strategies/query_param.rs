//! Fallback search by probing common query-parameter names.

use crate::error::Result;
use crate::heuristics::{extract_results, is_results_page};
use crate::http::HttpClient;
use crate::strategy::SearchStrategyTrait;
use crate::types::{RawResult, WebsiteInfo};

/// Parameter names tried in order; the walk stops at the first response
/// that looks like a results page.
const SEARCH_PARAMS: &[&str] = &["q", "query", "search", "s", "term", "keyword"];

/// Probes the base URL with common search parameter names. Handles any
/// website, so it terminates the strategy priority list.
pub struct QueryParamStrategy;

impl SearchStrategyTrait for QueryParamStrategy {
    fn can_handle(&self, _info: &WebsiteInfo) -> bool {
        true
    }

    async fn search(
        &self,
        base_url: &str,
        query: &str,
        _info: &WebsiteInfo,
        client: &HttpClient,
    ) -> Result<Vec<RawResult>> {
        tracing::info!(query, "using query parameter search strategy");

        for param in SEARCH_PARAMS {
            let params = vec![(param.to_string(), query.to_string())];
            let response = match client.get(base_url, &params).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::debug!(param, error = %e, "parameter probe failed");
                    continue;
                }
            };
            if !response.is_success() {
                continue;
            }

            if is_results_page(&response.body) {
                let results = extract_results(&response.body, base_url, query)?;
                tracing::info!(param, count = results.len(), "results via query parameter");
                return Ok(results);
            }
        }

        Ok(Vec::new())
    }
}
