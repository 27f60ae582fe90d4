//! # Search Error Types Module
//!
//! Error types for the question answering stage. Failures of the external
//! embedding and completion services are kept apart from caller mistakes so
//! the answerer can report which service was unavailable.

use rig::{completion::CompletionError, embeddings::EmbeddingError};
use thiserror::Error;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Error occurred during embedding generation
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error occurred while generating the answer
    #[error("Completion error: {0}")]
    Completion(String),

    /// Invalid search parameters
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
}

impl From<EmbeddingError> for SearchError {
    fn from(err: EmbeddingError) -> Self {
        SearchError::Embedding(err.to_string())
    }
}

impl From<CompletionError> for SearchError {
    fn from(err: CompletionError) -> Self {
        SearchError::Completion(err.to_string())
    }
}
