//! Per-result page metadata fetching and parsing.

use crate::error::{Result, ScrapeError};
use crate::http::HttpClient;
use crate::types::PageMetadata;
use scraper::{Html, Selector};
use url::Url;

/// Image URL cap per page.
const MAX_IMAGES: usize = 10;
/// Link URL cap per page.
const MAX_LINKS: usize = 20;

/// Fetch a result page and parse its metadata.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] on transport failure or a non-2xx
/// status; callers record this as `metadata_error` on the result.
pub async fn fetch_page_metadata(client: &HttpClient, url: &str) -> Result<PageMetadata> {
    let response = client.get(url, &[]).await?;
    if !response.is_success() {
        return Err(ScrapeError::Http(format!(
            "metadata fetch for {url} returned status {}",
            response.status
        )));
    }
    Ok(parse_page_metadata(&response.body, url))
}

/// Parse page metadata out of an HTML body.
///
/// Extracted as a separate function for testability with mock HTML.
pub fn parse_page_metadata(html: &str, base_url: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    let mut metadata = PageMetadata::default();

    if let Ok(sel) = Selector::parse("title") {
        metadata.page_title = document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());
    }

    metadata.page_description = meta_content(&document, r#"meta[name="description"]"#);
    metadata.page_keywords = meta_content(&document, r#"meta[name="keywords"]"#);
    metadata.page_author = meta_content(&document, r#"meta[name="author"]"#);
    metadata.page_published_date =
        meta_content(&document, r#"meta[property="article:published_time"]"#);
    metadata.page_modified_date =
        meta_content(&document, r#"meta[property="article:modified_time"]"#);

    if let Ok(sel) = Selector::parse("html") {
        metadata.page_language = document
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .map(String::from)
            .filter(|l| !l.is_empty());
    }

    if let Ok(sel) = Selector::parse("img[src]") {
        metadata.page_images = document
            .select(&sel)
            .take(MAX_IMAGES)
            .filter_map(|img| img.value().attr("src"))
            .filter_map(|src| absolutize(base_url, src))
            .collect();
    }

    if let Ok(sel) = Selector::parse("a[href]") {
        metadata.page_links = document
            .select(&sel)
            .take(MAX_LINKS)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| absolutize(base_url, href))
            .collect();
    }

    metadata.page_content_length = document
        .root_element()
        .text()
        .collect::<String>()
        .chars()
        .count();

    metadata
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    document
        .select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn absolutize(base: &str, href: &str) -> Option<String> {
    Url::parse(base).ok()?.join(href).ok().map(|u| u.to_string())
}
