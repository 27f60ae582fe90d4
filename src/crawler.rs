//! # Website Crawler Module
//!
//! This module crawls a single web domain from a seed URL and writes the plain
//! text of every reachable HTML page to the content store. It is the first stage
//! of the pipeline; the processor module picks the stored text up from disk.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: Seed URL, frontier discipline and fetch settings
//! - `Crawler`: Frontier/seen-set traversal over a [`PageFetcher`]
//! - `extract_hyperlinks` / `validate_domain_hyperlinks`: raw anchor extraction
//!   and domain-scoped canonicalization
//! - `ContentStore`: One text file per page, keyed by canonical URL
//!
//! ## Behavior
//!
//! - Only links whose authority equals the seed's domain are followed
//! - Every URL is fetched at most once; the crawl ends when the frontier is empty
//! - Non-HTML responses are neither written nor mined for links
//! - Pages that only say JavaScript is required are not written
//! - A page that cannot be stored is reported and the crawl moves on
//! - No depth or page limits, no politeness delays, no robots.txt handling

mod config;
mod content;
mod error;
mod fetch;
mod links;
mod normalize;
pub mod storage;
mod traversal;

// Re-export important types and functions
pub use config::{CrawlerConfig, CrawlerConfigBuilder, JAVASCRIPT_MARKER, TraversalOrder};
pub use content::{extract_text, requires_javascript};
pub use error::CrawlError;
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use links::{extract_hyperlinks, is_html, parse_hyperlinks};
pub use normalize::{canonicalize, domain_of, validate_domain_hyperlinks};
pub use storage::{ContentStore, StorageConfig, file_name_for};
pub use traversal::{Crawler, crawl_website};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Domain the crawl was confined to
    pub domain: String,

    /// URLs fetched successfully, in fetch order
    pub fetched: Vec<String>,

    /// URLs whose text was written to the content store
    pub written: Vec<String>,

    /// URLs whose response was not HTML
    pub skipped_non_html: Vec<String>,

    /// URLs that only served a "JavaScript required" page
    pub javascript_pages: Vec<String>,

    /// URLs that could not be fetched, with the reason
    pub failed: Vec<(String, String)>,

    /// URLs fetched but whose text could not be stored, with the reason
    pub write_failed: Vec<(String, String)>,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the frontier emptied
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    fn new(domain: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            domain: domain.to_string(),
            fetched: Vec::new(),
            written: Vec::new(),
            skipped_non_html: Vec::new(),
            javascript_pages: Vec::new(),
            failed: Vec::new(),
            write_failed: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_report_serializes() {
        let mut report = CrawlReport::new("example.com", Utc::now());
        report.fetched.push("https://example.com".to_string());
        report
            .failed
            .push(("https://example.com/x".to_string(), "status 500".to_string()));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["fetched"][0], "https://example.com");
        assert_eq!(json["failed"][0][1], "status 500");
    }
}
