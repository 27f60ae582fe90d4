//! Error types for the sitesage crate
//!
//! Each pipeline stage has its own error enum next to its code. This type
//! covers setup of the model clients.

use thiserror::Error;

/// Result type for sitesage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sitesage operations
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),
}
