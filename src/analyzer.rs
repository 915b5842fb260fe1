//! Website analysis: discover a site's search surface from its homepage
//! and well-known paths.
//!
//! Analysis never fails: sub-probe failures degrade to empty fields, and
//! a homepage fetch failure is recorded in [`WebsiteInfo::error`] with
//! whatever partial information was gathered.
//!
//! HTML probes are sync functions over the parsed document so they can
//! be tested against fixture strings and never hold a `scraper::Html`
//! across an await point.

use crate::http::HttpClient;
use crate::types::{
    FormInfo, LinkInfo, MetaInfo, SearchInput, WebsiteInfo, SEARCH_TERM_PLACEHOLDER,
};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Well-known sitemap locations probed with HEAD requests. robots.txt is
/// included because it frequently stands in for a sitemap reference.
const SITEMAP_PATHS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemaps.xml",
    "/robots.txt",
];

/// JavaScript frameworks whose presence suggests client-side rendering.
const JS_FRAMEWORKS: &[&str] = &["react", "vue", "angular", "jquery", "bootstrap"];

/// Page-text markers for AJAX-driven search.
const AJAX_INDICATORS: &[&str] = &["xhr", "ajax", "fetch", "xmlhttprequest"];

/// Link href/text patterns that mark a link as search-related.
const SEARCH_LINK_PATTERNS: &[&str] = &["search", "query", "find", "results", "category", "filter"];

/// Outcome of the search-form probe.
#[derive(Debug, Default)]
struct SearchFormProbe {
    has_search_form: bool,
    search_endpoints: Vec<String>,
    search_params: std::collections::BTreeMap<String, String>,
    form_methods: Vec<String>,
    search_inputs: Vec<SearchInput>,
}

/// Analyze a website and return everything learned about its search
/// surface.
pub async fn analyze_website(url: &str, client: &HttpClient) -> WebsiteInfo {
    tracing::info!(url, "starting website analysis");

    let mut info = WebsiteInfo {
        url: url.to_string(),
        domain: Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_default(),
        ..Default::default()
    };

    let homepage = match client.get(url, &[]).await {
        Ok(resp) if resp.is_success() => resp,
        Ok(resp) => {
            tracing::error!(url, status = resp.status, "homepage returned error status");
            info.error = Some(format!("homepage returned status {}", resp.status));
            return info;
        }
        Err(e) => {
            tracing::error!(url, error = %e, "homepage fetch failed");
            info.error = Some(e.to_string());
            return info;
        }
    };

    // Sync HTML probes; the parsed document never crosses an await.
    analyze_html(&homepage.body, url, &mut info);

    // Well-known sitemap locations.
    for path in SITEMAP_PATHS {
        let Some(sitemap_url) = join_url(url, path) else {
            continue;
        };
        match client.head(&sitemap_url).await {
            Ok(200) => {
                tracing::info!(sitemap_url, "found sitemap");
                info.sitemap_urls.push(sitemap_url);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(sitemap_url, error = %e, "sitemap probe failed");
            }
        }
    }

    // robots.txt body and its sitemap references; these are unioned with
    // the well-known-path findings, never overwriting them.
    if let Some(robots_url) = join_url(url, "/robots.txt") {
        match client.get(&robots_url, &[]).await {
            Ok(resp) if resp.is_success() => {
                let referenced = extract_robots_sitemaps(&resp.body);
                tracing::info!(count = referenced.len(), "robots.txt sitemap references");
                info.sitemap_urls.extend(referenced);
                info.robots_txt = Some(resp.body);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(robots_url, error = %e, "robots.txt fetch failed");
            }
        }
    }

    dedup_in_place(&mut info.sitemap_urls);

    tracing::info!(
        has_search_form = info.has_search_form,
        sitemaps = info.sitemap_urls.len(),
        requires_js = info.requires_js,
        "website analysis completed"
    );
    info
}

/// Run all HTML-based probes against the homepage body.
fn analyze_html(html: &str, base_url: &str, info: &mut WebsiteInfo) {
    let document = Html::parse_document(html);

    let probe = analyze_search_forms(&document, base_url);
    info.has_search_form = probe.has_search_form;
    info.search_endpoints = probe.search_endpoints;
    info.search_params = probe.search_params;
    info.form_methods = probe.form_methods;
    info.search_inputs = probe.search_inputs;

    info.meta_info = analyze_meta_info(&document);
    info.requires_js = requires_javascript(&document);
    info.forms = analyze_forms(&document);
    info.links = analyze_search_links(&document, base_url);
}

/// Detect search forms and their parameter mappings.
///
/// A form qualifies when its action, id, or class matches a search
/// pattern, or when it contains a search-related input. Matching input
/// names map to the query placeholder, defaulting to `q` when unnamed.
fn analyze_search_forms(document: &Html, base_url: &str) -> SearchFormProbe {
    let mut probe = SearchFormProbe::default();

    let Ok(form_sel) = Selector::parse("form") else {
        return probe;
    };
    let Ok(input_sel) = Selector::parse("input") else {
        return probe;
    };
    let attr_re = Regex::new(r"(?i)search|query|find").expect("form attr regex is valid");

    let mut seen = HashSet::new();
    let mut search_forms: Vec<ElementRef<'_>> = Vec::new();

    // Forms that look like search forms by their own attributes.
    for form in document.select(&form_sel) {
        let matches = ["action", "id", "class"]
            .iter()
            .any(|attr| form.value().attr(attr).is_some_and(|v| attr_re.is_match(v)));
        if matches && seen.insert(form.id()) {
            search_forms.push(form);
        }
    }

    // Forms reached through a search-related input.
    for form in document.select(&form_sel) {
        if seen.contains(&form.id()) {
            continue;
        }
        if form.select(&input_sel).any(|i| is_search_input(&i)) {
            seen.insert(form.id());
            search_forms.push(form);
        }
    }

    for form in search_forms {
        probe.has_search_form = true;

        let action = form.value().attr("action").unwrap_or("");
        let endpoint = if action.is_empty() {
            base_url.to_string()
        } else {
            join_url(base_url, action).unwrap_or_else(|| base_url.to_string())
        };
        probe.search_endpoints.push(endpoint);
        probe.form_methods.push(
            form.value()
                .attr("method")
                .unwrap_or("get")
                .to_lowercase(),
        );

        for input in form.select(&input_sel).filter(|i| is_search_input(i)) {
            let name = input.value().attr("name").unwrap_or("q").to_string();
            probe
                .search_params
                .insert(name.clone(), SEARCH_TERM_PLACEHOLDER.to_string());
            probe.search_inputs.push(SearchInput {
                name,
                input_type: input.value().attr("type").unwrap_or("text").to_string(),
                placeholder: input.value().attr("placeholder").map(String::from),
                id: input.value().attr("id").map(String::from),
            });
        }
    }

    probe
}

/// Whether an input element looks like a search box.
fn is_search_input(input: &ElementRef<'_>) -> bool {
    let name_re = Regex::new(r"(?i)search|query|q|find|term|keyword").expect("name regex is valid");
    let hint_re = Regex::new(r"(?i)search|query|find|enter").expect("placeholder regex is valid");
    let id_re = Regex::new(r"(?i)search|query|find").expect("id regex is valid");

    let input_type = input.value().attr("type").unwrap_or("text");
    if matches!(input_type, "text" | "search")
        && input.value().attr("name").is_some_and(|n| name_re.is_match(n))
    {
        return true;
    }
    if input
        .value()
        .attr("placeholder")
        .is_some_and(|p| hint_re.is_match(p))
    {
        return true;
    }
    input.value().attr("id").is_some_and(|i| id_re.is_match(i))
}

/// Extract title and meta description/keywords, first match each.
fn analyze_meta_info(document: &Html) -> MetaInfo {
    let mut meta = MetaInfo::default();

    if let Ok(sel) = Selector::parse("title") {
        meta.title = document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());
    }
    if let Ok(sel) = Selector::parse(r#"meta[name="description"]"#) {
        meta.description = document
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }
    if let Ok(sel) = Selector::parse(r#"meta[name="keywords"]"#) {
        meta.keywords = document
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }

    meta
}

/// Heuristic JavaScript requirement check: framework mentions in script
/// tags, or AJAX markers anywhere in the page text.
fn requires_javascript(document: &Html) -> bool {
    if let Ok(script_sel) = Selector::parse("script") {
        for script in document.select(&script_sel) {
            let src = script.value().attr("src").unwrap_or("").to_lowercase();
            let content = script.text().collect::<String>().to_lowercase();
            if JS_FRAMEWORKS
                .iter()
                .any(|fw| src.contains(fw) || content.contains(fw))
            {
                return true;
            }
        }
    }

    let page_text = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    AJAX_INDICATORS.iter().any(|ind| page_text.contains(ind))
}

/// Inventory of every form on the page.
fn analyze_forms(document: &Html) -> Vec<FormInfo> {
    let Ok(form_sel) = Selector::parse("form") else {
        return Vec::new();
    };
    let Ok(input_sel) = Selector::parse("input") else {
        return Vec::new();
    };

    document
        .select(&form_sel)
        .map(|form| FormInfo {
            action: form.value().attr("action").unwrap_or("").to_string(),
            method: form
                .value()
                .attr("method")
                .unwrap_or("get")
                .to_lowercase(),
            inputs: form
                .select(&input_sel)
                .filter_map(|i| i.value().attr("name").map(String::from))
                .collect(),
        })
        .collect()
}

/// Links whose href or text matches a search-related pattern.
fn analyze_search_links(document: &Html, base_url: &str) -> Vec<LinkInfo> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for anchor in document.select(&anchor_sel) {
        let href = anchor.value().attr("href").unwrap_or("");
        let text = anchor.text().collect::<String>().trim().to_string();
        let href_lower = href.to_lowercase();
        let text_lower = text.to_lowercase();

        let related = SEARCH_LINK_PATTERNS
            .iter()
            .any(|p| href_lower.contains(p) || text_lower.contains(p));
        if !related {
            continue;
        }

        let Some(absolute) = join_url(base_url, href) else {
            continue;
        };
        links.push(LinkInfo {
            href: absolute,
            text,
            title: anchor.value().attr("title").map(String::from),
        });
    }
    links
}

/// Pull `Sitemap:` references out of a robots.txt body, split at the
/// first colon so the URL's own scheme colon survives.
fn extract_robots_sitemaps(robots: &str) -> Vec<String> {
    robots
        .lines()
        .filter(|line| line.trim().to_lowercase().starts_with("sitemap:"))
        .filter_map(|line| line.splitn(2, ':').nth(1))
        .map(|rest| rest.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn join_url(base: &str, path: &str) -> Option<String> {
    Url::parse(base).ok()?.join(path).ok().map(|u| u.to_string())
}

fn dedup_in_place(urls: &mut Vec<String>) {
    let mut seen = HashSet::new();
    urls.retain(|u| seen.insert(u.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FORM_HTML: &str = r#"
        <html><head>
            <title>Example Music Site</title>
            <meta name="description" content="Find new mixtapes and albums">
            <meta name="keywords" content="music, mixtapes">
        </head><body>
            <form action="/search" method="get">
                <input type="text" name="q" placeholder="Search for music">
                <input type="hidden" name="lang" value="en">
            </form>
            <a href="/search/advanced">Advanced search</a>
            <a href="/contact">Contact</a>
        </body></html>
    "#;

    fn probe(html: &str) -> SearchFormProbe {
        let document = Html::parse_document(html);
        analyze_search_forms(&document, "https://example.com")
    }

    #[test]
    fn detects_form_by_action() {
        let p = probe(SEARCH_FORM_HTML);
        assert!(p.has_search_form);
        assert_eq!(p.search_endpoints, vec!["https://example.com/search"]);
        assert_eq!(p.form_methods, vec!["get"]);
        assert_eq!(
            p.search_params.get("q").map(String::as_str),
            Some(SEARCH_TERM_PLACEHOLDER)
        );
        // The hidden lang input is not a search input.
        assert!(!p.search_params.contains_key("lang"));
    }

    #[test]
    fn detects_form_by_input_name() {
        let p = probe(
            r#"<form action="/lookup"><input type="search" name="keyword"></form>"#,
        );
        assert!(p.has_search_form);
        assert!(p.search_params.contains_key("keyword"));
        assert_eq!(p.search_inputs[0].input_type, "search");
    }

    #[test]
    fn detects_form_by_placeholder() {
        let p = probe(r#"<form action="/go"><input type="text" name="x" placeholder="Enter a band name"></form>"#);
        assert!(p.has_search_form);
        assert!(p.search_params.contains_key("x"));
    }

    #[test]
    fn unnamed_search_input_defaults_to_q() {
        let p = probe(r#"<form id="searchbox"><input type="text" placeholder="Search here"></form>"#);
        assert!(p.has_search_form);
        assert!(p.search_params.contains_key("q"));
        // Form without action uses the page URL as endpoint.
        assert_eq!(p.search_endpoints, vec!["https://example.com"]);
    }

    #[test]
    fn plain_forms_are_not_search_forms() {
        let p = probe(
            r#"<form action="/subscribe" method="post"><input type="email" name="email"></form>"#,
        );
        assert!(!p.has_search_form);
        assert!(p.search_endpoints.is_empty());
    }

    #[test]
    fn form_counted_once_when_multiple_rules_match() {
        let p = probe(
            r#"<form action="/search" class="search-form"><input type="text" name="query"></form>"#,
        );
        assert_eq!(p.search_endpoints.len(), 1);
        assert_eq!(p.form_methods.len(), 1);
    }

    #[test]
    fn meta_info_extracted() {
        let document = Html::parse_document(SEARCH_FORM_HTML);
        let meta = analyze_meta_info(&document);
        assert_eq!(meta.title.as_deref(), Some("Example Music Site"));
        assert_eq!(
            meta.description.as_deref(),
            Some("Find new mixtapes and albums")
        );
        assert_eq!(meta.keywords.as_deref(), Some("music, mixtapes"));
    }

    #[test]
    fn js_detected_from_script_src() {
        let document = Html::parse_document(
            r#"<html><body><script src="/assets/react.min.js"></script></body></html>"#,
        );
        assert!(requires_javascript(&document));
    }

    #[test]
    fn js_detected_from_ajax_markers() {
        let document = Html::parse_document(
            "<html><body><p>Content loads via ajax on scroll</p></body></html>",
        );
        assert!(requires_javascript(&document));
    }

    #[test]
    fn static_page_does_not_require_js() {
        let document = Html::parse_document(
            "<html><body><h1>Plain old page</h1><p>Nothing dynamic.</p></body></html>",
        );
        assert!(!requires_javascript(&document));
    }

    #[test]
    fn search_links_collected_with_absolute_hrefs() {
        let document = Html::parse_document(SEARCH_FORM_HTML);
        let links = analyze_search_links(&document, "https://example.com");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "https://example.com/search/advanced");
        assert_eq!(links[0].text, "Advanced search");
    }

    #[test]
    fn forms_inventory_lists_input_names() {
        let document = Html::parse_document(SEARCH_FORM_HTML);
        let forms = analyze_forms(&document);
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].action, "/search");
        assert_eq!(forms[0].inputs, vec!["q", "lang"]);
    }

    #[test]
    fn robots_sitemap_lines_extracted() {
        let robots = "User-agent: *\nDisallow: /admin\nSitemap: https://example.com/sitemap.xml\n  sitemap: https://example.com/news.xml\n";
        let sitemaps = extract_robots_sitemaps(robots);
        assert_eq!(
            sitemaps,
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/news.xml"
            ]
        );
    }

    #[test]
    fn sitemap_urls_deduplicated_preserving_order() {
        let mut urls = vec![
            "https://example.com/sitemap.xml".to_string(),
            "https://example.com/robots.txt".to_string(),
            "https://example.com/sitemap.xml".to_string(),
        ];
        dedup_in_place(&mut urls);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://example.com/sitemap.xml");
    }

    #[tokio::test]
    async fn homepage_failure_records_error() {
        use crate::config::ScrapeConfig;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new(&ScrapeConfig::default()).expect("client");
        let info = analyze_website(&server.uri(), &client).await;
        assert!(info.error.as_deref().is_some_and(|e| e.contains("503")));
        assert!(!info.has_search_form);
        assert_eq!(info.domain, "127.0.0.1");
    }

    #[tokio::test]
    async fn full_analysis_against_mock_site() {
        use crate::config::ScrapeConfig;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_FORM_HTML))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Sitemap: https://example.com/extra.xml\n"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::new(&ScrapeConfig::default()).expect("client");
        let info = analyze_website(&server.uri(), &client).await;

        assert!(info.error.is_none());
        assert!(info.has_search_form);
        assert_eq!(info.search_endpoints.len(), 1);
        assert!(info.search_endpoints[0].ends_with("/search"));
        // Union of HEAD probes and robots.txt references.
        assert!(info
            .sitemap_urls
            .iter()
            .any(|u| u.ends_with("/sitemap.xml")));
        assert!(info
            .sitemap_urls
            .iter()
            .any(|u| u == "https://example.com/extra.xml"));
        assert!(info
            .sitemap_urls
            .iter()
            .any(|u| u.ends_with("/robots.txt")));
        assert_eq!(info.meta_info.title.as_deref(), Some("Example Music Site"));
        assert!(!info.forms.is_empty());
        assert!(!info.links.is_empty());
    }
}
