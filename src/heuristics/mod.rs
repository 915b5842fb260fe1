//! Heuristic HTML classification shared by all search strategies.
//!
//! All heuristics are sync functions over `&str` bodies: `scraper::Html`
//! is not `Send` and must never be held across an await point.

mod dedup;
mod results;

pub use dedup::dedup_by_url;
pub use results::{extract_results, is_results_page};
