//! Chunk table module
//!
//! The chunk table is the only artifact shared between the embedding stage and
//! the question answering stage. It is persisted as CSV with the columns
//! `text`, `n_tokens` and `embeddings`, preceded by an unnamed row index
//! column. Embeddings are stored as a JSON list of floats.

pub mod error;
mod table;

pub use error::IndexError;
pub use table::{ChunkTable, TABLE_HEADERS};

use serde::{Deserialize, Serialize};

/// One embedded chunk of page text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Text of the chunk
    pub text: String,

    /// Number of tokens in the text
    pub n_tokens: usize,

    /// Embedding vector of the text
    pub embeddings: Vec<f64>,
}

impl ChunkRecord {
    pub fn new(text: impl Into<String>, n_tokens: usize, embeddings: Vec<f64>) -> Self {
        Self {
            text: text.into(),
            n_tokens,
            embeddings,
        }
    }
}
