//! # LLM Client Module
//!
//! This module provides a unified client interface for the two external
//! services the pipeline depends on: an embedding service (text to vector) and
//! a completion service (prompt to text). Provider models are wrapped with
//! rate limiting to avoid exhausting API quotas during large embedding runs.
//!
//! ## Key Components
//!
//! - `Client`: A unified client that wraps both completion and embedding models
//! - `RateLimitedCompletionModel`: A wrapper that adds rate limiting to any completion model
//! - `RateLimitedEmbeddingModel`: A wrapper that adds rate limiting to any embedding model
//! - `MockCompletionModel` / `MockEmbeddingModel`: Offline stand-ins for tests
//!
//! ## Features
//!
//! - OpenAI and Gemini providers through the `rig` framework
//! - Environment variable configuration for API keys
//! - Instrumentation with tracing spans for monitoring

use std::num::NonZeroU32;

use governor::{Quota, RateLimiter};
use ratelimited_completion::RateLimitedCompletionModel;
use ratelimited_embedding::RateLimitedEmbeddingModel;
use rig::{
    completion::CompletionModel,
    embeddings::EmbeddingModel,
    providers::{gemini, openai},
};

use crate::error::{Error, Result};

pub mod mock_model;
pub mod ratelimited_completion;
pub mod ratelimited_embedding;

pub use mock_model::{MockCompletionModel, MockEmbeddingModel};

/// Completion model used with OpenAI
pub const OPENAI_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Embedding model used with OpenAI
pub const OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Completion model used with Gemini
pub const GEMINI_COMPLETION_MODEL: &str = "gemini-2.0-flash";

/// Embedding model used with Gemini
pub const GEMINI_EMBEDDING_MODEL: &str = gemini::embedding::EMBEDDING_004;

#[derive(Debug, Clone)]
pub struct Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    completion_model: C,
    embedding_model: E,
}

pub struct RateLimitResponse<T> {
    #[allow(dead_code)]
    response: T,
}

fn per_minute(limit: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN))
}

fn api_key(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| Error::Auth(format!("{} environment variable must be set", var)))
}

/// Client backed by OpenAI models
pub type OpenAiClient = Client<
    RateLimitedCompletionModel<openai::CompletionModel>,
    RateLimitedEmbeddingModel<openai::EmbeddingModel>,
>;

/// Client backed by Gemini models
pub type GeminiClient = Client<
    RateLimitedCompletionModel<gemini::completion::CompletionModel>,
    RateLimitedEmbeddingModel<gemini::embedding::EmbeddingModel>,
>;

impl OpenAiClient {
    /// Client for the named models, keyed by `OPENAI_API_KEY`
    pub fn new_openai_from_env(completion_model: &str, embedding_model: &str) -> Result<Self> {
        let openai_client = openai::Client::new(&api_key("OPENAI_API_KEY")?);
        Ok(Self::new_openai(openai_client, completion_model, embedding_model))
    }

    pub fn new_openai(
        openai_client: openai::Client,
        completion_model: &str,
        embedding_model: &str,
    ) -> Self {
        let completion_model = RateLimitedCompletionModel::new(
            openai_client.completion_model(completion_model),
            RateLimiter::direct(per_minute(500)),
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            openai_client.embedding_model(embedding_model),
            RateLimiter::direct(per_minute(3000)),
        );
        Self {
            completion_model,
            embedding_model,
        }
    }
}

impl GeminiClient {
    /// Client for the named models, keyed by `GEMINI_API_KEY`
    pub fn new_gemini_from_env(completion_model: &str, embedding_model: &str) -> Result<Self> {
        let gemini_client = gemini::Client::new(&api_key("GEMINI_API_KEY")?);
        Ok(Self::new_gemini(gemini_client, completion_model, embedding_model))
    }

    pub fn new_gemini(
        gemini_client: gemini::Client,
        completion_model: &str,
        embedding_model: &str,
    ) -> Self {
        let completion_model = RateLimitedCompletionModel::new(
            gemini_client.completion_model(completion_model),
            RateLimiter::direct(per_minute(2000)),
        );
        let embedding_model = RateLimitedEmbeddingModel::new(
            gemini_client.embedding_model(embedding_model),
            RateLimiter::direct(per_minute(1000)),
        );
        Self {
            completion_model,
            embedding_model,
        }
    }
}

impl<C, E> Client<C, E>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    /// Pair an arbitrary completion model with an embedding model
    pub fn new(completion_model: C, embedding_model: E) -> Self {
        Self {
            completion_model,
            embedding_model,
        }
    }

    pub fn completion(&self) -> &C {
        &self.completion_model
    }

    pub fn embedding(&self) -> &E {
        &self.embedding_model
    }
}
