use std::sync::Arc;

use governor::DefaultDirectRateLimiter;
use rig::embeddings::{Embedding, EmbeddingError, EmbeddingModel};
use tracing::{Instrument, debug_span, info_span};

/// Embedding model that waits for a rate-limiter permit before every batch
#[derive(Clone)]
pub struct RateLimitedEmbeddingModel<M: EmbeddingModel> {
    model: M,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<M> RateLimitedEmbeddingModel<M>
where
    M: EmbeddingModel,
{
    pub fn new(model: M, limiter: DefaultDirectRateLimiter) -> Self {
        Self {
            model,
            limiter: Arc::new(limiter),
        }
    }

    /// The wrapped model
    pub fn inner(&self) -> &M {
        &self.model
    }
}

impl<M: EmbeddingModel> EmbeddingModel for RateLimitedEmbeddingModel<M> {
    const MAX_DOCUMENTS: usize = M::MAX_DOCUMENTS;

    fn ndims(&self) -> usize {
        self.model.ndims()
    }

    async fn embed_texts(
        &self,
        texts: impl IntoIterator<Item = String> + Send,
    ) -> Result<Vec<Embedding>, EmbeddingError> {
        let texts: Vec<String> = texts.into_iter().collect();
        let batch_size = texts.len();
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;
        self.model
            .embed_texts(texts)
            .instrument(info_span!("embed_texts", batch_size))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockEmbeddingModel;
    use governor::{Quota, RateLimiter};
    use std::num::NonZeroU32;

    #[tokio::test]
    async fn test_delegates_to_inner_model() {
        let inner = MockEmbeddingModel::new(4);
        let limiter = RateLimiter::direct(Quota::per_minute(NonZeroU32::new(60).unwrap()));
        let model = RateLimitedEmbeddingModel::new(inner.clone(), limiter);

        assert_eq!(model.ndims(), 4);
        let embeddings = model
            .embed_texts(vec!["one".to_string(), "two".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 2);
        assert_eq!(inner.batches().await, vec![2]);
    }
}
