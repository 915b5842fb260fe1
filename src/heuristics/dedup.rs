//! URL-based deduplication of extracted results.

use crate::types::RawResult;
use std::collections::HashSet;

/// Remove results with duplicate URLs, keeping the first occurrence and
/// preserving encounter order.
pub fn dedup_by_url(results: Vec<RawResult>) -> Vec<RawResult> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}
