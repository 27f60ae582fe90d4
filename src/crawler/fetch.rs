//! Page fetching for the crawler module
//!
//! The crawl loop talks to the network through the [`PageFetcher`] trait so the
//! traversal can be driven by an in-memory site in tests.

use std::future::Future;

use reqwest::Client as ReqwestClient;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use crate::crawler::CrawlerConfig;
use crate::crawler::error::CrawlError;

/// A fetched response, before any parsing
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Declared `Content-Type`, if the server sent one
    pub content_type: Option<String>,

    /// Response body decoded as text
    pub body: String,
}

/// Source of pages for the crawler
pub trait PageFetcher {
    /// Fetch one URL
    ///
    /// Implementations report network failures and non-success statuses as
    /// errors for which [`CrawlError::is_fetch_error`] holds.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send;
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
}

impl HttpFetcher {
    /// Build a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let mut builder = ReqwestClient::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CrawlError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        debug!(
            "Fetched {} ({} bytes, content type {:?})",
            url,
            body.len(),
            content_type
        );

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_html() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/docs")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<a href='/next'>next</a>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
        let page = fetcher.fetch(&format!("{}/docs", server.url())).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(page.body, "<a href='/next'>next</a>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", "sitesage-test")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let config = CrawlerConfig::builder().user_agent("sitesage-test").build();
        let fetcher = HttpFetcher::new(&config).unwrap();
        fetcher.fetch(&format!("{}/", server.url())).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Status { status: 404, .. }));
        assert!(err.is_fetch_error());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, CrawlError::Http(_)));
    }
}
