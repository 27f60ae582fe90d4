//! Content processor module
//!
//! This module turns crawled page text into an embedded chunk table:
//! whitespace normalization, token-window chunking and batched embedding.

mod chunking;
mod config;
mod embedding;
mod error;

pub use chunking::{
    Cl100kTokenizer, Tokenizer, preprocess_text, shorten_texts, split_into_many,
};
pub use config::{ChunkOptions, ProcessorConfig, ProcessorConfigBuilder};
pub use embedding::{build_chunk_table, embed_domain};
pub use error::ProcessError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_options() {
        let options = ChunkOptions::default();
        assert_eq!(options.max_tokens, 500);
    }

    #[test]
    fn test_processor_config() {
        let config = ProcessorConfig::builder()
            .max_tokens(200)
            .batch_size(4)
            .build();

        assert_eq!(config.chunk_options.max_tokens, 200);
        assert_eq!(config.batch_size, 4);

        let config = ProcessorConfig::builder()
            .chunk_options(ChunkOptions { max_tokens: 50 })
            .build();
        assert_eq!(config.chunk_options.max_tokens, 50);
        assert_eq!(config.batch_size, 16);
    }
}
