use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{config::Config, errors::AppResult};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static RESULT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a\s[^>]*class="result__a"[^>]*>(.*?)</a>"#)
        .expect("RESULT_LINK is a valid regex pattern")
});
static RESULT_SNIPPET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(?:a|div)\s[^>]*class="result__snippet"[^>]*>(.*?)</(?:a|div)>"#)
        .expect("RESULT_SNIPPET is a valid regex pattern")
});
static HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]*)""#).expect("HREF is a valid regex pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("TAG is a valid regex pattern"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("SPACES is a valid regex pattern"));
static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));")
        .expect("NUMERIC_ENTITY is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search collaborator backing the article and document lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchHit>>;
}

/// Scrapes the DuckDuckGo HTML results page.
pub struct DuckDuckGoClient {
    http: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(&config.search_base_url, config.scrape_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl WebSearchClient for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchHit>> {
        let html = self
            .http
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let hits = parse_results(&html, max_results);
        log::debug!("search '{}' returned {} results", query, hits.len());
        Ok(hits)
    }
}

/// Pulls title/url/snippet out of the first `max_results` result blocks.
/// Markup it does not recognise yields no hits rather than an error.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let links: Vec<_> = RESULT_LINK.captures_iter(html).collect();
    let mut hits = Vec::new();

    for (i, caps) in links.iter().enumerate() {
        if hits.len() >= max_results {
            break;
        }
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let Some(url) = HREF
            .captures(whole.as_str())
            .and_then(|c| c.get(1))
            .and_then(|href| resolve_href(href.as_str()))
        else {
            continue;
        };

        let block_end = links
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let snippet = RESULT_SNIPPET
            .captures(&html[whole.end()..block_end])
            .and_then(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .unwrap_or_default();

        let title = clean_text(inner.as_str());
        if title.is_empty() {
            continue;
        }

        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
    }

    hits
}

/// Unwraps DuckDuckGo's `/l/?uddg=` redirect and drops ad links.
fn resolve_href(raw: &str) -> Option<String> {
    let href = decode_entities(raw);

    let target = match href.split_once("uddg=") {
        Some((_, rest)) => {
            let encoded = rest.split('&').next().unwrap_or_default();
            urlencoding::decode(encoded).ok()?.into_owned()
        }
        None => href,
    };

    let target = match target.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => target,
    };

    let is_ad = target.contains("duckduckgo.com/y.js");
    (target.starts_with("http") && !is_ad).then_some(target)
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, "");
    let decoded = decode_entities(&stripped);
    SPACES.replace_all(decoded.trim(), " ").into_owned()
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        // Unknown code points stay as written.
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    numeric
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const SAMPLE: &str = r#"
<div class="result results_links results_links_deep web-result ">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.geeksforgeeks.org%2Fbinary-search%2F&amp;rut=abc">Binary Search &amp; <b>Variants</b></a>
    </h2>
    <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Learn <b>binary search</b> with   examples.</a>
  </div>
</div>
<div class="result results_links results_links_deep web-result ">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="https://duckduckgo.com/y.js?ad_domain=ads.example">Sponsored</a>
    </h2>
  </div>
</div>
<div class="result results_links results_links_deep web-result ">
  <div class="links_main links_deep result__body">
    <h2 class="result__title">
      <a rel="nofollow" class="result__a" href="https://www.w3schools.com/dsa/dsa_algo_binarysearch.php">DSA Binary Search</a>
    </h2>
  </div>
</div>
"#;

    #[test]
    fn parses_titles_urls_and_snippets() {
        let hits = parse_results(SAMPLE, 10);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Binary Search & Variants");
        assert_eq!(hits[0].url, "https://www.geeksforgeeks.org/binary-search/");
        assert_eq!(hits[0].snippet, "Learn binary search with examples.");
        assert_eq!(hits[1].url, "https://www.w3schools.com/dsa/dsa_algo_binarysearch.php");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn decodes_numeric_entities() {
        assert_eq!(
            clean_text("Rust&#8217;s ownership &#x2014; a guide &#X27;101&#39;"),
            "Rust\u{2019}s ownership \u{2014} a guide '101'"
        );
        assert_eq!(decode_entities("&amp;#38; &#xD800;"), "&#38; &#xD800;");
    }

    #[test]
    fn respects_max_results() {
        assert_eq!(parse_results(SAMPLE, 1).len(), 1);
        assert!(parse_results(SAMPLE, 0).is_empty());
    }

    #[test]
    fn malformed_markup_yields_nothing() {
        assert!(parse_results("<html><body><a class=\"result__a\"", 5).is_empty());
        assert!(parse_results("", 5).is_empty());
    }

    #[tokio::test]
    async fn fetches_and_parses_results_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "binary search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let client =
            DuckDuckGoClient::with_base_url(&format!("{}/html/", server.uri()), Duration::from_secs(2))
                .unwrap();
        let hits = client.search("binary search", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn server_error_surfaces_as_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = DuckDuckGoClient::with_base_url(&server.uri(), Duration::from_secs(2)).unwrap();
        assert!(client.search("anything", 5).await.is_err());
    }
}
