//! # Chunk Table Error Types Module
//!
//! Error types for reading and writing the persisted chunk table.
//!
//! ## Key Components
//!
//! - `IndexError`: Enum representing different types of chunk table failures

use thiserror::Error;

/// Error type for chunk table operations
#[derive(Debug, Error)]
pub enum IndexError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Embedding column could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Row content is malformed or inconsistent with the rest of the table
    #[error("Data error: {0}")]
    Data(String),
}
