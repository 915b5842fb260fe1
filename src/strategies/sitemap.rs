//! Search by scanning the site's sitemaps for query-relevant URLs.

use crate::error::{Result, ScrapeError};
use crate::http::HttpClient;
use crate::strategy::SearchStrategyTrait;
use crate::types::{RawResult, WebsiteInfo};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One `<url>` entry from a sitemap.
#[derive(Debug, Clone)]
struct SitemapEntry {
    loc: String,
    /// Non-standard, but some generators emit a `<title>` per entry.
    title: Option<String>,
}

/// Scans each discovered sitemap and keeps URLs containing any query word.
pub struct SitemapStrategy;

impl SearchStrategyTrait for SitemapStrategy {
    fn can_handle(&self, info: &WebsiteInfo) -> bool {
        !info.sitemap_urls.is_empty()
    }

    async fn search(
        &self,
        _base_url: &str,
        query: &str,
        info: &WebsiteInfo,
        client: &HttpClient,
    ) -> Result<Vec<RawResult>> {
        tracing::info!(query, "using sitemap search strategy");

        let mut results = Vec::new();
        for sitemap_url in &info.sitemap_urls {
            let response = match client.get(sitemap_url, &[]).await {
                Ok(resp) => resp,
                Err(e) => {
                    tracing::warn!(sitemap_url, error = %e, "sitemap fetch failed");
                    continue;
                }
            };
            if !response.is_success() {
                tracing::warn!(sitemap_url, status = response.status, "sitemap returned error status");
                continue;
            }

            let entries = match parse_sitemap(&response.body) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(sitemap_url, error = %e, "sitemap parse failed");
                    continue;
                }
            };

            let mut count = 0;
            for entry in entries {
                if !is_url_relevant(&entry.loc, query) {
                    continue;
                }
                results.push(RawResult {
                    url: entry.loc,
                    title: entry.title,
                    description: None,
                    query: query.to_string(),
                    source_url: sitemap_url.clone(),
                });
                count += 1;
            }
            tracing::info!(sitemap_url, count, "results from sitemap");
        }

        Ok(results)
    }
}

/// Parse `<url>` entries from a sitemap document.
fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_url = false;
    let mut current_tag = String::new();
    let mut current_loc = String::new();
    let mut current_title = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" {
                    in_url = true;
                    current_loc.clear();
                    current_title.clear();
                } else {
                    current_tag = name;
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" && in_url {
                    if !current_loc.is_empty() {
                        let title = if current_title.is_empty() {
                            None
                        } else {
                            Some(current_title.clone())
                        };
                        entries.push(SitemapEntry {
                            loc: current_loc.clone(),
                            title,
                        });
                    }
                    in_url = false;
                } else {
                    current_tag.clear();
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                if in_url && current_tag == "loc" {
                    current_loc = text;
                } else if in_url && current_tag == "title" {
                    current_title = text;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ScrapeError::Parse(format!("sitemap XML error: {e}")));
            }
            _ => {}
        }
    }

    Ok(entries)
}

/// A URL is relevant when any whitespace-split lowercase query word is a
/// substring of the lowercased URL.
fn is_url_relevant(url: &str, query: &str) -> bool {
    let url_lower = url.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .any(|word| url_lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrapeConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SITEMAP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/artist/beyonce</loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url>
    <loc>https://example.com/artist/prince</loc>
    <title>Prince</title>
  </url>
  <url>
    <loc>https://example.com/about</loc>
  </url>
</urlset>"#;

    #[test]
    fn handles_only_sites_with_sitemaps() {
        let info = WebsiteInfo {
            sitemap_urls: vec!["https://example.com/sitemap.xml".into()],
            ..Default::default()
        };
        assert!(SitemapStrategy.can_handle(&info));
        assert!(!SitemapStrategy.can_handle(&WebsiteInfo::default()));
    }

    #[test]
    fn parses_loc_and_optional_title() {
        let entries = parse_sitemap(SITEMAP_XML).expect("parse");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].loc, "https://example.com/artist/beyonce");
        assert_eq!(entries[0].title, None);
        assert_eq!(entries[1].title.as_deref(), Some("Prince"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let err = parse_sitemap("<urlset><url><loc>x</url>").expect_err("should fail");
        assert!(err.to_string().contains("sitemap XML"));
    }

    #[test]
    fn relevance_matches_any_query_word() {
        assert!(is_url_relevant(
            "https://example.com/artist/beyonce-single-ladies",
            "Beyonce Single Ladies"
        ));
        assert!(is_url_relevant("https://example.com/ladies-night", "single ladies"));
        assert!(!is_url_relevant("https://example.com/about", "beyonce"));
    }

    #[tokio::test]
    async fn search_filters_by_query_words() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SITEMAP_XML)
                    .insert_header("content-type", "application/xml"),
            )
            .mount(&server)
            .await;

        let info = WebsiteInfo {
            sitemap_urls: vec![format!("{}/sitemap.xml", server.uri())],
            ..Default::default()
        };
        let client = HttpClient::new(&ScrapeConfig::default()).expect("client");

        let results = SitemapStrategy
            .search(&server.uri(), "beyonce", &info, &client)
            .await
            .expect("search");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/artist/beyonce");
        assert!(results[0].title.is_none());
        assert_eq!(results[0].source_url, format!("{}/sitemap.xml", server.uri()));
    }

    #[tokio::test]
    async fn unreachable_sitemap_is_skipped() {
        let server = MockServer::start().await;
        // No mock for /missing.xml: wiremock answers 404.
        let info = WebsiteInfo {
            sitemap_urls: vec![format!("{}/missing.xml", server.uri())],
            ..Default::default()
        };
        let client = HttpClient::new(&ScrapeConfig::default()).expect("client");

        let results = SitemapStrategy
            .search(&server.uri(), "anything", &info, &client)
            .await
            .expect("search");
        assert!(results.is_empty());
    }
}
