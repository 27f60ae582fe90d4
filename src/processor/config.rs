//! # Processor Configuration Module
//!
//! Configuration structures and builders for the chunking and embedding stage.
//! Chunk size is measured in tokens of the configured tokenizer; the embedding
//! batch size is capped by the embedding model's own document limit.
//!
//! ## Key Components
//!
//! - `ChunkOptions`: Controls the chunking behavior (maximum tokens per chunk)
//! - `ProcessorConfig`: Complete configuration for the processor pipeline
//! - `ProcessorConfigBuilder`: Builder pattern implementation for easier configuration

/// Configuration for chunking text
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum number of tokens in a chunk
    pub max_tokens: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self { max_tokens: 500 }
    }
}

/// Configuration for the processor
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Options for chunking
    pub chunk_options: ChunkOptions,

    /// Number of chunks sent to the embedding service per request
    pub batch_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chunk_options: ChunkOptions::default(),
            batch_size: 16,
        }
    }
}

/// Builder for ProcessorConfig
#[derive(Debug, Default)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    /// Set the chunk options
    pub fn chunk_options(mut self, chunk_options: ChunkOptions) -> Self {
        self.config.chunk_options = chunk_options;
        self
    }

    /// Set the maximum tokens per chunk
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.chunk_options.max_tokens = max_tokens;
        self
    }

    /// Set the embedding batch size
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ProcessorConfig {
        self.config
    }
}

impl ProcessorConfig {
    /// Create a new builder
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}
