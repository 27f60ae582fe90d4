//! # Mock Models for Testing
//!
//! Provides `MockCompletionModel` and `MockEmbeddingModel`, implementations of
//! the `rig` model traits that never touch the network. Both can be switched
//! into a failing mode to simulate a provider outage.

use rig::{
    completion::{
        AssistantContent, CompletionError, CompletionModel, CompletionRequest, CompletionResponse,
    },
    embeddings::{Embedding, EmbeddingError, EmbeddingModel},
    one_or_many::OneOrMany,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock completion model for testing purposes.
/// It returns a predefined response or error when `completion` is called.
#[derive(Debug, Clone)]
pub struct MockCompletionModel {
    /// The predefined response to return. Arc<Mutex<>> allows modification after creation if needed.
    response: Arc<Mutex<Option<OneOrMany<AssistantContent>>>>,

    /// When set, every call fails with this message
    error: Arc<Mutex<Option<String>>>,

    /// Number of completion calls made
    calls: Arc<Mutex<usize>>,
}

impl MockCompletionModel {
    /// Creates a new mock model that will return a default empty success response.
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Sets the response that the mock model should return.
    pub async fn set_response(&self, response: OneOrMany<AssistantContent>) {
        let mut guard = self.response.lock().await;
        *guard = Some(response);
    }

    /// Helper to create a simple text response.
    pub async fn set_text_response(&self, text: &str) {
        let response = OneOrMany::one(AssistantContent::text(text));
        self.set_response(response).await;
    }

    /// Make every following call fail with a provider error.
    pub async fn set_error(&self, message: &str) {
        *self.error.lock().await = Some(message.to_string());
    }

    /// Number of completion calls made so far.
    pub async fn calls(&self) -> usize {
        *self.calls.lock().await
    }
}

impl Default for MockCompletionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionModel for MockCompletionModel {
    type Response = String;

    async fn completion(
        &self,
        _completion_request: CompletionRequest,
    ) -> Result<CompletionResponse<Self::Response>, CompletionError> {
        *self.calls.lock().await += 1;
        if let Some(message) = self.error.lock().await.clone() {
            return Err(CompletionError::ProviderError(message));
        }

        let response = {
            let guard = self.response.lock().await;
            guard.clone()
        };
        match response {
            Some(result) => Ok(CompletionResponse {
                choice: result,
                raw_response: "".to_string(),
            }),
            None => Ok(CompletionResponse {
                choice: OneOrMany::one(AssistantContent::text("")),
                raw_response: "".to_string(),
            }),
        }
    }
}

/// A mock embedding model for testing purposes.
///
/// Texts registered with [`MockEmbeddingModel::with_embedding`] get that exact
/// vector. Any other text is embedded as a letter histogram folded into
/// `ndims` buckets, so texts sharing letters land close to each other.
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    ndims: usize,
    fixed: HashMap<String, Vec<f64>>,
    error: Option<String>,

    /// Sizes of the batches passed to `embed_texts`
    batches: Arc<Mutex<Vec<usize>>>,
}

impl MockEmbeddingModel {
    /// Creates a new mock model producing `ndims`-dimensional vectors.
    pub fn new(ndims: usize) -> Self {
        Self {
            ndims: ndims.max(1),
            fixed: HashMap::new(),
            error: None,
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return `vec` whenever `text` is embedded.
    pub fn with_embedding(mut self, text: &str, vec: Vec<f64>) -> Self {
        self.fixed.insert(text.to_string(), vec);
        self
    }

    /// Make every call fail with a provider error.
    pub fn failing(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    /// Sizes of every batch embedded so far.
    pub async fn batches(&self) -> Vec<usize> {
        self.batches.lock().await.clone()
    }

    fn embed_one(&self, text: &str) -> Vec<f64> {
        if let Some(vec) = self.fixed.get(text) {
            return vec.clone();
        }
        let mut vec = vec![0.0; self.ndims];
        for c in text.chars().filter(|c| c.is_alphanumeric()) {
            for lower in c.to_lowercase() {
                vec[lower as usize % self.ndims] += 1.0;
            }
        }
        vec
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    const MAX_DOCUMENTS: usize = 8;

    fn ndims(&self) -> usize {
        self.ndims
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        if let Some(message) = &self.error {
            return Err(EmbeddingError::ProviderError(message.clone()));
        }

        let embeddings: Vec<Embedding> = texts
            .into_iter()
            .map(|document| Embedding {
                vec: self.embed_one(&document),
                document,
            })
            .collect();
        self.batches.lock().await.push(embeddings.len());
        Ok(embeddings)
    }
}
