//! Error types for the processor module

use crate::crawler::CrawlError;
use crate::index::IndexError;
use rig::embeddings::EmbeddingError;
use thiserror::Error;

/// Error type for processor operations
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Embedding generation error
    #[error("Embedding generation error: {0}")]
    EmbeddingGeneration(String),

    /// Chunking error
    #[error("Chunking error: {0}")]
    Chunking(String),

    /// Stored pages could not be read
    #[error("Failed to load pages: {0}")]
    Load(#[from] CrawlError),

    /// Chunk table could not be written
    #[error("Failed to write chunk table: {0}")]
    Index(#[from] IndexError),
}

impl From<EmbeddingError> for ProcessError {
    fn from(err: EmbeddingError) -> Self {
        Self::EmbeddingGeneration(err.to_string())
    }
}
