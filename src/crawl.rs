//! Crawl client adapter over the Firecrawl v1 API.
//!
//! A crawl is started with `POST /crawl` and then polled at `GET
//! /crawl/{id}` until the service reports completion. The adapter flattens
//! the returned pages into one markdown string per site, concatenated in
//! service order with no separator between pages (page boundaries are not
//! preserved).
//!
//! Zero returned pages is a valid result: the site's article is the empty
//! string and the pipeline continues. Everything else that goes wrong —
//! transport errors, non-2xx responses, a refused or failed crawl, a poll
//! timeout — is a [`DigestError::Crawl`] carrying the site's url and limit.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{DigestError, Result};
use crate::models::{CrawledPage, SiteDescriptor};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Produces one aggregated markdown article per site.
///
/// The pipeline depends on this seam rather than on the concrete client, so
/// tests substitute stub implementations.
pub trait FetchArticle {
    async fn fetch_article(&self, site: &SiteDescriptor) -> Result<String>;
}

/// Firecrawl-backed implementation of [`FetchArticle`].
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

#[derive(Serialize)]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: u32,
    #[serde(rename = "scrapeOptions")]
    scrape_options: ScrapeOptions,
}

#[derive(Serialize)]
struct ScrapeOptions {
    formats: Vec<String>,
}

#[derive(Deserialize)]
struct CrawlStartResponse {
    success: bool,
    id: Option<String>,
}

#[derive(Deserialize)]
struct CrawlStatusResponse {
    status: String,
    data: Option<Vec<CrawlPageData>>,
}

#[derive(Deserialize)]
struct CrawlPageData {
    markdown: Option<String>,
}

impl FirecrawlClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DigestError::Config(format!("http client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.firecrawl_api_key.clone(),
            base_url: config.firecrawl_api_url.clone(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        })
    }

    /// Set the interval between crawl-status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the total time to wait for a crawl before giving up.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    async fn crawl_site(&self, site: &SiteDescriptor) -> Result<Vec<CrawledPage>> {
        let request = CrawlRequest {
            url: &site.url,
            limit: site.limit,
            scrape_options: ScrapeOptions {
                formats: vec!["markdown".to_string()],
            },
        };

        let start: CrawlStartResponse = self.post_json("/crawl", &request, site).await?;
        if !start.success {
            return Err(crawl_error(site, "service refused to start the crawl"));
        }
        let crawl_id = start
            .id
            .ok_or_else(|| crawl_error(site, "service returned no crawl id"))?;
        info!(crawl_id = %crawl_id, "Crawl started; polling for completion");

        let deadline = Instant::now() + self.poll_timeout;
        loop {
            if Instant::now() >= deadline {
                return Err(crawl_error(site, "timed out waiting for the crawl to complete"));
            }
            sleep(self.poll_interval).await;

            let status: CrawlStatusResponse = self
                .get_json(&format!("/crawl/{crawl_id}"), site)
                .await?;
            match status.status.as_str() {
                "completed" => {
                    let pages: Vec<CrawledPage> = status
                        .data
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|page| page.markdown)
                        .map(|content| CrawledPage { content })
                        .collect();
                    info!(pages = pages.len(), "Crawl completed");
                    return Ok(pages);
                }
                "failed" => {
                    return Err(crawl_error(site, "service reported the crawl failed"));
                }
                other => debug!(status = %other, "Crawl in progress"),
            }
        }
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
        site: &SiteDescriptor,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| crawl_error(site, &e.to_string()))?;
        read_json(response, site).await
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        site: &SiteDescriptor,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| crawl_error(site, &e.to_string()))?;
        read_json(response, site).await
    }
}

impl FetchArticle for FirecrawlClient {
    #[instrument(level = "info", skip_all, fields(url = %site.url, limit = site.limit))]
    async fn fetch_article(&self, site: &SiteDescriptor) -> Result<String> {
        let pages = self.crawl_site(site).await?;
        if pages.is_empty() {
            warn!("Crawl returned zero pages; recording an empty article");
        }
        Ok(collect_markdown(&pages))
    }
}

/// Concatenate page markdown in service order, with no separator.
pub fn collect_markdown(pages: &[CrawledPage]) -> String {
    pages.iter().map(|page| page.content.as_str()).collect()
}

async fn read_json<R: DeserializeOwned>(
    response: reqwest::Response,
    site: &SiteDescriptor,
) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(crawl_error(site, &format!("HTTP {status}: {body}")));
    }
    response
        .json()
        .await
        .map_err(|e| crawl_error(site, &e.to_string()))
}

fn crawl_error(site: &SiteDescriptor, reason: &str) -> DigestError {
    DigestError::Crawl {
        url: site.url.clone(),
        limit: site.limit,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> CrawledPage {
        CrawledPage {
            content: content.to_string(),
        }
    }

    #[test]
    fn test_collect_markdown_concatenates_in_order() {
        let pages = vec![page("# First\n"), page("second"), page(" third")];
        assert_eq!(collect_markdown(&pages), "# First\nsecond third");
    }

    #[test]
    fn test_collect_markdown_inserts_no_separator() {
        let pages = vec![page("a"), page("b")];
        assert_eq!(collect_markdown(&pages), "ab");
    }

    #[test]
    fn test_collect_markdown_of_zero_pages_is_empty() {
        assert_eq!(collect_markdown(&[]), "");
    }

    #[test]
    fn test_crawl_request_wire_format() {
        let request = CrawlRequest {
            url: "https://a.example",
            limit: 5,
            scrape_options: ScrapeOptions {
                formats: vec!["markdown".to_string()],
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://a.example");
        assert_eq!(json["limit"], 5);
        assert_eq!(json["scrapeOptions"]["formats"][0], "markdown");
    }

    #[test]
    fn test_status_response_parses_pages() {
        let raw = r#"{
            "status": "completed",
            "completed": 2,
            "total": 2,
            "data": [
                { "markdown": "page one", "metadata": { "title": "One" } },
                { "markdown": "page two" },
                { "metadata": { "title": "no body" } }
            ]
        }"#;

        let status: CrawlStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(status.status, "completed");
        let pages: Vec<String> = status
            .data
            .unwrap()
            .into_iter()
            .filter_map(|p| p.markdown)
            .collect();
        assert_eq!(pages, vec!["page one".to_string(), "page two".to_string()]);
    }

    #[test]
    fn test_start_response_parses_without_id() {
        let raw = r#"{ "success": false }"#;
        let start: CrawlStartResponse = serde_json::from_str(raw).unwrap();
        assert!(!start.success);
        assert!(start.id.is_none());
    }

    #[test]
    fn test_crawl_error_carries_site_details() {
        let site = SiteDescriptor {
            url: "https://b.example".to_string(),
            limit: 2,
        };
        let err = crawl_error(&site, "boom");
        match err {
            DigestError::Crawl { url, limit, reason } => {
                assert_eq!(url, "https://b.example");
                assert_eq!(limit, 2);
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
