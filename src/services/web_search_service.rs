//! Article and document lookup by scraping DuckDuckGo's server-rendered
//! results page.

use crate::models::resource::ResourceKind;
use crate::models::search::SearchResource;
use crate::services::fetcher::{ensure_success, FetchError, ResourceFetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

static RESULT_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result").expect("result selector is valid"));
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("title selector is valid"));
static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__snippet").expect("snippet selector is valid"));

const DOCUMENT_FILTER: &str = "filetype:pdf";

#[derive(Clone)]
pub struct DuckDuckGoFetcher {
    client: reqwest::Client,
    base_url: String,
    kind: ResourceKind,
    query_suffix: Option<&'static str>,
    max_results: usize,
}

impl DuckDuckGoFetcher {
    /// Web articles for a topic.
    pub fn articles(
        client: reqwest::Client,
        base_url: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            kind: ResourceKind::Article,
            query_suffix: None,
            max_results,
        }
    }

    /// PDF documents for a topic.
    pub fn documents(
        client: reqwest::Client,
        base_url: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            kind: ResourceKind::Document,
            query_suffix: Some(DOCUMENT_FILTER),
            max_results,
        }
    }

    fn build_query(&self, topic: &str) -> String {
        match self.query_suffix {
            Some(suffix) => format!("{} {}", topic, suffix),
            None => topic.to_string(),
        }
    }

    #[instrument(skip(self), fields(source = "duckduckgo", kind = %self.kind))]
    pub async fn search(&self, topic: &str) -> Result<Vec<SearchResource>, FetchError> {
        let base = Url::parse(&self.base_url)?;
        let query = self.build_query(topic);

        let response = self
            .client
            .get(format!("{}/html/", self.base_url))
            .query(&[("q", query.as_str())])
            .send()
            .await?;
        ensure_success(&response)?;
        let body = response.text().await?;

        let results = parse_results(&body, &base, self.kind, self.max_results);
        debug!(count = results.len(), "web search complete");
        Ok(results)
    }
}

#[async_trait]
impl ResourceFetcher for DuckDuckGoFetcher {
    async fn fetch(&self, topic: &str) -> Vec<SearchResource> {
        match self.search(topic).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, topic, kind = %self.kind, "Error scraping DuckDuckGo");
                Vec::new()
            }
        }
    }
}

/// Extract up to `max_results` entries from a results page.
///
/// A `div.result` block qualifies only when it holds both a title link and a
/// snippet. Blocks whose link cannot be resolved to an absolute http(s) URL
/// are skipped as well.
pub fn parse_results(
    html: &str,
    base: &Url,
    kind: ResourceKind,
    max_results: usize,
) -> Vec<SearchResource> {
    let document = Html::parse_document(html);

    document
        .select(&RESULT_BLOCK)
        .filter_map(|block| parse_block(&block, base, kind))
        .take(max_results)
        .collect()
}

fn parse_block(block: &ElementRef, base: &Url, kind: ResourceKind) -> Option<SearchResource> {
    let title_elem = block.select(&TITLE_LINK).next()?;
    let snippet_elem = block.select(&SNIPPET).next()?;

    let href = title_elem.value().attr("href")?;
    let url = resolve_result_url(base, href)?;
    let source = source_domain(&url)?;

    Some(SearchResource {
        kind,
        source,
        title: collapse_whitespace(title_elem.text()),
        url: url.to_string(),
        thumbnail: None,
        snippet: Some(collapse_whitespace(snippet_elem.text())),
    })
}

/// Resolve a result href to the page it points at.
///
/// DuckDuckGo links through a protocol-relative redirect
/// (`//duckduckgo.com/l/?uddg=<target>`); those are unwrapped to the target.
pub fn resolve_result_url(base: &Url, href: &str) -> Option<Url> {
    let url = base.join(href.trim()).ok()?;

    let is_redirect = url.path() == "/l/"
        && url
            .host_str()
            .is_some_and(|host| host.ends_with("duckduckgo.com"));
    let url = if is_redirect {
        let target = url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())?;
        Url::parse(&target).ok()?
    } else {
        url
    };

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

/// Host of `url` with one leading `www.` removed.
pub fn source_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

fn collapse_whitespace<'a>(text: impl Iterator<Item = &'a str>) -> String {
    text.collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r##"
        <html><body>
          <div class="results">
            <div class="result results_links web-result">
              <h2 class="result__title">
                <a class="result__a" href="https://www.rust-lang.org/learn">Learn <b>Rust</b></a>
              </h2>
              <a class="result__snippet" href="https://www.rust-lang.org/learn">
                Get started with <b>Rust</b>.
              </a>
            </div>
            <div class="result results_links web-result">
              <a class="result__a" href="https://example.com/no-snippet">Missing snippet</a>
            </div>
            <div class="result results_links web-result">
              <a class="result__snippet" href="https://example.com/no-title">Only a snippet</a>
            </div>
            <div class="result results_links web-result">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdoc.rust-lang.org%2Fbook%2F&amp;rut=abc">The Book</a>
              <a class="result__snippet" href="#">The Rust Programming Language</a>
            </div>
            <div class="result results_links web-result">
              <a class="result__a" href="javascript:void(0)">Broken link</a>
              <a class="result__snippet" href="#">Should be skipped</a>
            </div>
            <div class="result results_links web-result">
              <a class="result__a" href="http://blog.example.org/ownership">Ownership</a>
              <a class="result__snippet" href="#">Borrowing explained</a>
            </div>
          </div>
        </body></html>
    "##;

    fn base() -> Url {
        Url::parse("https://html.duckduckgo.com").unwrap()
    }

    #[test]
    fn test_parse_results_keeps_only_qualifying_blocks() {
        let results = parse_results(RESULTS_PAGE, &base(), ResourceKind::Article, 12);

        assert_eq!(results.len(), 3);

        assert_eq!(results[0].kind, ResourceKind::Article);
        assert_eq!(results[0].title, "Learn Rust");
        assert_eq!(results[0].url, "https://www.rust-lang.org/learn");
        assert_eq!(results[0].source, "rust-lang.org");
        assert_eq!(results[0].snippet.as_deref(), Some("Get started with Rust."));
        assert_eq!(results[0].thumbnail, None);

        assert_eq!(results[1].title, "The Book");
        assert_eq!(results[1].url, "https://doc.rust-lang.org/book/");
        assert_eq!(results[1].source, "doc.rust-lang.org");

        assert_eq!(results[2].source, "blog.example.org");
    }

    #[test]
    fn test_parse_results_respects_cap() {
        let results = parse_results(RESULTS_PAGE, &base(), ResourceKind::Document, 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.kind == ResourceKind::Document));
    }

    #[test]
    fn test_parse_results_on_garbage_is_empty() {
        let results = parse_results("<<<not html at all", &base(), ResourceKind::Article, 12);
        assert!(results.is_empty());
    }

    #[test]
    fn test_source_domain_strips_single_www() {
        let url = Url::parse("https://www.example.com/path").unwrap();
        assert_eq!(source_domain(&url).as_deref(), Some("example.com"));

        let url = Url::parse("https://www.www.example.com/").unwrap();
        assert_eq!(source_domain(&url).as_deref(), Some("www.example.com"));

        let url = Url::parse("https://docs.example.com/").unwrap();
        assert_eq!(source_domain(&url).as_deref(), Some("docs.example.com"));
    }

    #[test]
    fn test_resolve_result_url_rejects_unusable_links() {
        assert!(resolve_result_url(&base(), "mailto:someone@example.com").is_none());
        assert!(resolve_result_url(&base(), "//duckduckgo.com/l/?rut=missing-target").is_none());
    }

    #[test]
    fn test_document_query_appends_filetype_filter() {
        let client = reqwest::Client::new();
        let documents =
            DuckDuckGoFetcher::documents(client.clone(), "https://html.duckduckgo.com", 12);
        let articles = DuckDuckGoFetcher::articles(client, "https://html.duckduckgo.com", 12);

        assert_eq!(documents.build_query("linear algebra"), "linear algebra filetype:pdf");
        assert_eq!(articles.build_query("linear algebra"), "linear algebra");
        assert_eq!(documents.kind, ResourceKind::Document);
    }
}
