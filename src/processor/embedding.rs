//! # Embedding Pipeline Module
//!
//! Turns stored page text into a [`ChunkTable`] by chunking it and embedding
//! every chunk through the client's embedding model.
//!
//! Chunks are sent in batches no larger than the model's `MAX_DOCUMENTS`.
//! Progress is reported as the number of chunks embedded per batch so callers
//! can drive a progress bar.

use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::crawler::ContentStore;
use crate::index::{ChunkRecord, ChunkTable};
use crate::model::Client;
use crate::processor::{
    Cl100kTokenizer, ProcessorConfig, Tokenizer, error::ProcessError, preprocess_text,
    shorten_texts,
};

/// Embed already chunked texts into a chunk table
///
/// Records keep the order of `chunks`. Any embedding failure aborts the run.
#[instrument(skip(client, tokenizer, chunks, progress), fields(chunks = chunks.len()))]
pub async fn build_chunk_table<C, E, T>(
    client: &Client<C, E>,
    tokenizer: &T,
    chunks: Vec<String>,
    config: &ProcessorConfig,
    progress: Option<mpsc::Sender<usize>>,
) -> Result<ChunkTable, ProcessError>
where
    C: CompletionModel,
    E: EmbeddingModel,
    T: Tokenizer,
{
    let batch_size = config.batch_size.clamp(1, E::MAX_DOCUMENTS.max(1));
    let mut table = ChunkTable::new();

    for batch in chunks.chunks(batch_size) {
        let n_tokens: Vec<usize> = batch.iter().map(|text| tokenizer.count(text)).collect();
        let embeddings = client.embedding().embed_texts(batch.to_vec()).await?;

        if embeddings.len() != batch.len() {
            return Err(ProcessError::EmbeddingGeneration(format!(
                "Expected {} embeddings, received {}",
                batch.len(),
                embeddings.len()
            )));
        }

        for ((text, n_tokens), embedding) in batch.iter().zip(n_tokens).zip(embeddings) {
            table.push(ChunkRecord::new(text.as_str(), n_tokens, embedding.vec))?;
        }
        debug!("Embedded batch of {} chunks", batch.len());

        if let Some(sender) = &progress
            && sender.send(batch.len()).await.is_err()
        {
            warn!("Progress receiver dropped");
        }
    }

    Ok(table)
}

/// Chunk and embed every stored page of a domain
///
/// Returns the table without persisting it.
#[instrument(skip(client, store, config, progress))]
pub async fn embed_domain<C, E>(
    client: &Client<C, E>,
    store: &ContentStore,
    domain: &str,
    config: &ProcessorConfig,
    progress: Option<mpsc::Sender<usize>>,
) -> Result<ChunkTable, ProcessError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let pages = store.load_texts(domain).await?;
    let texts: Vec<String> = pages.iter().map(|(_, text)| preprocess_text(text)).collect();

    let tokenizer = Cl100kTokenizer::new()?;
    let chunks = shorten_texts(&tokenizer, &texts, &config.chunk_options)?;
    info!("Split {} pages into {} chunks", pages.len(), chunks.len());

    build_chunk_table(client, &tokenizer, chunks, config, progress).await
}
