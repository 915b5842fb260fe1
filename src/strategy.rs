//! Strategy selection and dispatch.
//!
//! The priority order in [`STRATEGY_PRIORITY`] is a hard invariant:
//! selection walks the list and picks the first strategy whose
//! `can_handle` predicate passes, so behavior depends on list order.
//! QueryParam always passes and terminates the walk.

use crate::error::Result;
use crate::http::HttpClient;
use crate::strategies::{FormStrategy, QueryParamStrategy, SitemapStrategy};
use crate::types::{RawResult, WebsiteInfo};
use serde::{Deserialize, Serialize};

/// The available search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Submit the site's own search form endpoints.
    Form,
    /// Scan the site's sitemaps for URLs matching the query.
    Sitemap,
    /// Probe common query-parameter names against the base URL.
    QueryParam,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Form => "form",
            Self::Sitemap => "sitemap",
            Self::QueryParam => "query_param",
        };
        write!(f, "{name}")
    }
}

/// Fixed strategy priority order.
pub const STRATEGY_PRIORITY: &[StrategyKind] = &[
    StrategyKind::Form,
    StrategyKind::Sitemap,
    StrategyKind::QueryParam,
];

/// A pluggable search strategy.
///
/// Implementors produce raw results for one query against one website,
/// using the analysis record to decide how to search. Transport failures
/// inside a strategy are contained per endpoint; a strategy returning an
/// empty vector is a miss, not an error.
pub trait SearchStrategyTrait: Send + Sync {
    /// Whether this strategy can search the analyzed website.
    fn can_handle(&self, info: &WebsiteInfo) -> bool;

    /// Search the website for `query` and return extracted raw results.
    ///
    /// # Errors
    ///
    /// Returns an error only when the strategy cannot run at all;
    /// individual endpoint failures are logged and skipped.
    fn search(
        &self,
        base_url: &str,
        query: &str,
        info: &WebsiteInfo,
        client: &HttpClient,
    ) -> impl std::future::Future<Output = Result<Vec<RawResult>>> + Send;
}

/// Select the first strategy in priority order that can handle the site.
///
/// Always returns `Some` while QueryParam is last in the list; the
/// `Option` is kept so callers handle an empty priority list explicitly.
pub fn select_strategy(info: &WebsiteInfo) -> Option<StrategyKind> {
    STRATEGY_PRIORITY
        .iter()
        .copied()
        .find(|kind| kind_can_handle(*kind, info))
}

fn kind_can_handle(kind: StrategyKind, info: &WebsiteInfo) -> bool {
    match kind {
        StrategyKind::Form => FormStrategy.can_handle(info),
        StrategyKind::Sitemap => SitemapStrategy.can_handle(info),
        StrategyKind::QueryParam => QueryParamStrategy.can_handle(info),
    }
}

/// Run a search with the selected strategy.
pub async fn run_search(
    kind: StrategyKind,
    base_url: &str,
    query: &str,
    info: &WebsiteInfo,
    client: &HttpClient,
) -> Result<Vec<RawResult>> {
    match kind {
        StrategyKind::Form => FormStrategy.search(base_url, query, info, client).await,
        StrategyKind::Sitemap => SitemapStrategy.search(base_url, query, info, client).await,
        StrategyKind::QueryParam => {
            QueryParamStrategy
                .search(base_url, query, info, client)
                .await
        }
    }
}
