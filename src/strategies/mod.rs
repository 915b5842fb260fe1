//! Concrete search strategy implementations.

mod form;
mod query_param;
mod sitemap;

pub use form::FormStrategy;
pub use query_param::QueryParamStrategy;
pub use sitemap::SitemapStrategy;
