use std::time::Duration;

use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{ClientConfig, PageConfig, SearchConfig};
use crate::error::{GrokipediaError, Result};
use crate::types::{self, Page, PageEnvelope, SearchEnvelope, SearchResult};

pub const SEARCH_PATH: &str = "api/full-text-search";
pub const PAGE_PATH: &str = "api/page";

/// HTTP client for the Grokipedia API.
///
/// Every call issues exactly one GET, bounded by the configured timeout and
/// by an optional caller [`CancellationToken`]. The client holds no state
/// besides its connection pool, so it can be shared and called concurrently.
#[derive(Debug, Clone)]
pub struct GrokipediaClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl GrokipediaClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|source| GrokipediaError::Request {
                context: "error creating HTTP client",
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full-text search. Results come back in server ranking order and are
    /// not truncated client-side; `limit` is advisory to the server.
    pub async fn search(&self, query: &str, config: SearchConfig) -> Result<Vec<SearchResult>> {
        self.search_with_cancel(query, config, &CancellationToken::new())
            .await
    }

    pub async fn search_with_cancel(
        &self,
        query: &str,
        config: SearchConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        let url = search_url(&self.base_url, query, &config)?;
        log::debug!("searching grokipedia: {url}");

        let (status, body) = self
            .get(url, cancel, "error fetching from Grokipedia API")
            .await?;

        if status != StatusCode::OK {
            log::warn!("search for {query:?} failed with HTTP {status}");
            return Err(GrokipediaError::Api {
                status: status.as_u16(),
                body: None,
            });
        }

        let envelope: SearchEnvelope = serde_json::from_slice(&body)?;
        let results = envelope.normalize();
        log::debug!("search for {query:?} returned {} results", results.len());
        Ok(results)
    }

    /// Slug-only search that keeps at most the effective limit, in server
    /// order.
    pub async fn search_slugs(&self, query: &str, config: SearchConfig) -> Result<Vec<String>> {
        let (limit, _) = config.resolve();
        let results = self.search(query, config).await?;
        Ok(types::slugs(&results, limit as usize))
    }

    /// Fetch one page by slug.
    ///
    /// A 404 and a 200 whose envelope says `found: false` both come back as
    /// [`GrokipediaError::NotFound`].
    pub async fn get_page(&self, slug: &str, config: PageConfig) -> Result<Page> {
        self.get_page_with_cancel(slug, config, &CancellationToken::new())
            .await
    }

    pub async fn get_page_with_cancel(
        &self,
        slug: &str,
        config: PageConfig,
        cancel: &CancellationToken,
    ) -> Result<Page> {
        let url = page_url(&self.base_url, slug, &config)?;
        log::debug!("fetching grokipedia page: {url}");

        let (status, body) = self
            .get(url, cancel, "error fetching page from Grokipedia API")
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Err(GrokipediaError::NotFound {
                slug: slug.to_string(),
            });
        }
        if status != StatusCode::OK {
            log::warn!("page {slug:?} failed with HTTP {status}");
            let text = String::from_utf8_lossy(&body).into_owned();
            return Err(GrokipediaError::Api {
                status: status.as_u16(),
                body: (!text.trim().is_empty()).then_some(text),
            });
        }

        let envelope: PageEnvelope = serde_json::from_slice(&body)?;
        if !envelope.found {
            return Err(GrokipediaError::NotFound {
                slug: slug.to_string(),
            });
        }

        Ok(envelope.page.unwrap_or_default().normalize())
    }

    /// Send a GET and read the whole body, racing the timeout and `cancel`.
    async fn get(
        &self,
        url: Url,
        cancel: &CancellationToken,
        context: &'static str,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let request = async {
            let response = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|source| GrokipediaError::Request { context, source })?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|source| GrokipediaError::Request {
                    context: "error reading response body",
                    source,
                })?;
            Ok::<_, GrokipediaError>((status, body.to_vec()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GrokipediaError::Cancelled),
            res = tokio::time::timeout(self.timeout, request) => match res {
                Ok(res) => res,
                Err(_) => Err(GrokipediaError::Timeout(self.timeout)),
            },
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `<base>/api/full-text-search?query=..&limit=..&offset=..` with the
/// limit and offset already defaulted.
pub fn search_url(base: &Url, query: &str, config: &SearchConfig) -> Result<Url> {
    let (limit, offset) = config.resolve();
    let mut url = base.join(SEARCH_PATH)?;
    url.query_pairs_mut()
        .append_pair("query", query)
        .append_pair("limit", &limit.to_string())
        .append_pair("offset", &offset.to_string());
    Ok(url)
}

/// `<base>/api/page?slug=..&includeContent=..&validateLinks=true`
pub fn page_url(base: &Url, slug: &str, config: &PageConfig) -> Result<Url> {
    let mut url = base.join(PAGE_PATH)?;
    url.query_pairs_mut()
        .append_pair("slug", slug)
        .append_pair("includeContent", &config.include_content.to_string())
        .append_pair("validateLinks", "true");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        normalize_base_url("https://grokipedia.com").unwrap()
    }

    #[test]
    fn test_search_url_defaults() {
        let url = search_url(&base(), "Grok", &SearchConfig::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://grokipedia.com/api/full-text-search?query=Grok&limit=10&offset=0"
        );
    }

    #[test]
    fn test_search_url_escapes_query() {
        let cfg = SearchConfig::default().with_limit(3).with_offset(6);
        let url = search_url(&base(), "artificial intelligence & more", &cfg).unwrap();
        assert_eq!(
            url.as_str(),
            "https://grokipedia.com/api/full-text-search?query=artificial+intelligence+%26+more&limit=3&offset=6"
        );
    }

    #[test]
    fn test_search_url_normalizes_paging() {
        let cfg = SearchConfig::default().with_limit(-4).with_offset(-1);
        let url = search_url(&base(), "x", &cfg).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("limit".to_string(), "10".to_string())));
        assert!(pairs.contains(&("offset".to_string(), "0".to_string())));
    }

    #[test]
    fn test_page_url() {
        let url = page_url(&base(), "United_Petroleum", &PageConfig::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://grokipedia.com/api/page?slug=United_Petroleum&includeContent=true&validateLinks=true"
        );

        let url = page_url(&base(), "C++ (language)", &PageConfig::without_content()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://grokipedia.com/api/page?slug=C%2B%2B+%28language%29&includeContent=false&validateLinks=true"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let base = normalize_base_url("http://localhost:8080/proxy").unwrap();
        let url = page_url(&base, "Grok", &PageConfig::default()).unwrap();
        assert_eq!(url.path(), "/proxy/api/page");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = GrokipediaClient::with_config(ClientConfig::default().with_base_url("not a url"))
            .unwrap_err();
        assert!(matches!(err, GrokipediaError::InvalidUrl(_)));
    }

    #[test]
    fn test_client_keeps_timeout() {
        let client = GrokipediaClient::with_config(
            ClientConfig::default().with_timeout(Duration::from_millis(250)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(250));
        assert_eq!(client.base_url().as_str(), "https://grokipedia.com/");
    }
}
