//! Search via the site's own search form endpoints.

use crate::error::Result;
use crate::heuristics::extract_results;
use crate::http::HttpClient;
use crate::strategy::SearchStrategyTrait;
use crate::types::{RawResult, WebsiteInfo, SEARCH_TERM_PLACEHOLDER};

/// Submits discovered search forms via GET with the analyzer's parameter
/// mapping, substituting the query for the placeholder marker.
pub struct FormStrategy;

impl SearchStrategyTrait for FormStrategy {
    fn can_handle(&self, info: &WebsiteInfo) -> bool {
        info.has_search_form
    }

    async fn search(
        &self,
        base_url: &str,
        query: &str,
        info: &WebsiteInfo,
        client: &HttpClient,
    ) -> Result<Vec<RawResult>> {
        tracing::info!(query, "using form search strategy");

        let endpoints: Vec<String> = if info.search_endpoints.is_empty() {
            vec![base_url.to_string()]
        } else {
            info.search_endpoints.clone()
        };

        let params: Vec<(String, String)> = info
            .search_params
            .iter()
            .map(|(name, value)| {
                let value = if value == SEARCH_TERM_PLACEHOLDER {
                    query.to_string()
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect();

        let mut results = Vec::new();
        for endpoint in &endpoints {
            let response = match client.get(endpoint, &params).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(endpoint, error = %e, "search request failed");
                    continue;
                }
            };
            if !response.is_success() {
                tracing::warn!(endpoint, status = response.status, "search returned error status");
                continue;
            }

            let page_results = extract_results(&response.body, endpoint, query)?;
            tracing::info!(endpoint, count = page_results.len(), "results from endpoint");
            results.extend(page_results);
        }

        Ok(results)
    }
}
