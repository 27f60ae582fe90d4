//! # Crawler Configuration Module
//!
//! Configuration for a single-domain crawl. Everything the traversal needs
//! (seed, discovery order, marker text for script-only pages) is carried here
//! instead of living in process-wide constants, so several crawls can run in
//! one process with different settings.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct with crawler parameters
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration
//! - `TraversalOrder`: Which end of the frontier the next URL is taken from

use std::time::Duration;

/// Marker text served by single-page apps that need script execution
pub const JAVASCRIPT_MARKER: &str = "You need to enable JavaScript to run this app.";

/// Order in which discovered URLs are taken off the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// First in, first out
    #[default]
    BreadthFirst,

    /// Last in, first out
    DepthFirst,
}

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Absolute http(s) URL the crawl starts from
    pub seed_url: String,

    /// Frontier discipline
    pub traversal: TraversalOrder,

    /// User agent to use for requests
    pub user_agent: String,

    /// Request timeout, `None` keeps the HTTP client default
    pub request_timeout: Option<Duration>,

    /// Pages whose text contains this marker are not persisted
    pub javascript_marker: String,

    /// Log and skip URLs that fail to fetch instead of aborting the crawl
    pub continue_on_fetch_error: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            traversal: TraversalOrder::default(),
            user_agent: format!("sitesage-crawler/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: None,
            javascript_marker: JAVASCRIPT_MARKER.to_string(),
            continue_on_fetch_error: true,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the seed URL
    pub fn seed_url(mut self, seed_url: impl Into<String>) -> Self {
        self.config.seed_url = seed_url.into();
        self
    }

    /// Set the frontier discipline
    pub fn traversal(mut self, traversal: TraversalOrder) -> Self {
        self.config.traversal = traversal;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set a request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    /// Set the marker text that identifies script-only pages
    pub fn javascript_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.javascript_marker = marker.into();
        self
    }

    /// Set whether fetch failures are skipped or abort the crawl
    pub fn continue_on_fetch_error(mut self, continue_on_fetch_error: bool) -> Self {
        self.config.continue_on_fetch_error = continue_on_fetch_error;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.traversal, TraversalOrder::BreadthFirst);
        assert_eq!(config.javascript_marker, JAVASCRIPT_MARKER);
        assert!(config.request_timeout.is_none());
        assert!(config.continue_on_fetch_error);
        assert!(config.user_agent.starts_with("sitesage-crawler/"));
    }

    #[test]
    fn test_builder() {
        let config = CrawlerConfig::builder()
            .seed_url("https://example.com/")
            .traversal(TraversalOrder::DepthFirst)
            .user_agent("test-agent")
            .request_timeout(Duration::from_secs(5))
            .continue_on_fetch_error(false)
            .build();

        assert_eq!(config.seed_url, "https://example.com/");
        assert_eq!(config.traversal, TraversalOrder::DepthFirst);
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert!(!config.continue_on_fetch_error);
    }
}
