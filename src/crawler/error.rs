//! Error types for the crawler module

use std::path::PathBuf;

use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned status {status}")]
    Status {
        /// URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Seed URL is not an absolute http(s) URL with a host
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    /// Content store error
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Another URL of this crawl already wrote the same file
    #[error("{url} maps to {} which was already written in this crawl", path.display())]
    FileCollision {
        /// URL whose text was not written
        url: String,
        /// File both URLs map to
        path: PathBuf,
    },
}

impl CrawlError {
    /// Whether this error concerns a single fetch and the crawl can move on
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, CrawlError::Http(_) | CrawlError::Status { .. })
    }

    /// Whether this error concerns writing a single page
    pub fn is_write_error(&self) -> bool {
        matches!(
            self,
            CrawlError::Storage(_) | CrawlError::FileCollision { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let status = CrawlError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert!(status.is_fetch_error());
        assert!(!status.is_write_error());
        assert_eq!(
            status.to_string(),
            "https://example.com/missing returned status 404"
        );

        let storage = CrawlError::Storage(std::io::Error::other("disk full"));
        assert!(!storage.is_fetch_error());
        assert!(storage.is_write_error());
        assert!(!CrawlError::InvalidSeed("ftp://x".to_string()).is_fetch_error());
    }

    #[test]
    fn test_file_collision_message() {
        let err = CrawlError::FileCollision {
            url: "https://example.com/a".to_string(),
            path: PathBuf::from("text/example.com/example.com_a.txt"),
        };
        assert!(err.is_write_error());
        assert_eq!(
            err.to_string(),
            "https://example.com/a maps to text/example.com/example.com_a.txt which was already written in this crawl"
        );
    }
}
