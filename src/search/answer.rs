//! Retrieval and answer generation over a chunk table

use rig::{
    completion::{AssistantContent, CompletionModel},
    embeddings::EmbeddingModel,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::index::{ChunkRecord, ChunkTable};
use crate::model::Client;
use crate::search::SearchError;

/// Separator placed between chunks in the context
pub const CONTEXT_SEPARATOR: &str = "\n\n###\n\n";

/// Tokens charged per chunk on top of its own count, for the separator
const SEPARATOR_TOKENS: usize = 4;

/// Outcome of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    /// The completion service produced an answer, possibly "I don't know"
    Answered(String),

    /// A service failed; the reason is kept for the caller
    Unavailable(String),
}

impl Answer {
    /// Answer text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Answered(text) => Some(text),
            Answer::Unavailable(_) => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Answered(_))
    }
}

/// Options for answering a question
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    /// Token budget of the context
    pub max_context_len: usize,

    /// Maximum tokens generated for the answer
    pub max_tokens: u64,

    /// Sampling temperature
    pub temperature: f64,

    /// Sequence at which generation stops
    pub stop_sequence: Option<String>,

    /// Log the prompt context before asking
    pub debug: bool,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self {
            max_context_len: 1800,
            max_tokens: 150,
            temperature: 0.0,
            stop_sequence: None,
            debug: false,
        }
    }
}

/// Cosine distance between two vectors
///
/// Returns 1.0 when either vector has zero magnitude. Extra components of the
/// longer vector are ignored.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank every chunk by distance to the query, closest first
///
/// Ties keep table order.
pub fn rank_chunks<'a>(query: &[f64], table: &'a ChunkTable) -> Vec<(f64, &'a ChunkRecord)> {
    let mut ranked: Vec<(f64, &ChunkRecord)> = table
        .records()
        .iter()
        .map(|record| (cosine_distance(query, &record.embeddings), record))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked
}

/// Join ranked chunks until the token budget is exceeded
///
/// Each chunk costs its token count plus four. The chunk that pushes the total
/// over `max_len` is not included.
pub fn build_context(ranked: &[(f64, &ChunkRecord)], max_len: usize) -> String {
    let mut total = 0;
    let mut parts = Vec::new();

    for (_, record) in ranked {
        total += record.n_tokens + SEPARATOR_TOKENS;
        if total > max_len {
            break;
        }
        parts.push(record.text.as_str());
    }

    parts.join(CONTEXT_SEPARATOR)
}

/// Prompt sent to the completion service
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the question based on the context below, and if the question can't be answered based on the context, say \"I don't know\"\n\nContext: {}\n\n---\n\nQuestion: {}\nAnswer:",
        context, question
    )
}

/// Build the context for a question from the most similar chunks
#[instrument(skip(client, table), fields(chunks = table.len()))]
pub async fn create_context<C, E>(
    client: &Client<C, E>,
    question: &str,
    table: &ChunkTable,
    max_len: usize,
) -> Result<String, SearchError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    if question.trim().is_empty() {
        return Err(SearchError::InvalidParameters(
            "question must not be empty".to_string(),
        ));
    }

    let query = client.embedding().embed_text(question).await?;
    if let Some(dims) = table.dimensions()
        && dims != query.vec.len()
    {
        return Err(SearchError::Embedding(format!(
            "Question embedding has {} dimensions, table has {}",
            query.vec.len(),
            dims
        )));
    }

    let ranked = rank_chunks(&query.vec, table);
    let context = build_context(&ranked, max_len);
    debug!("Built context of {} bytes", context.len());
    Ok(context)
}

async fn complete<C, E>(
    client: &Client<C, E>,
    question: &str,
    table: &ChunkTable,
    options: &AnswerOptions,
) -> Result<String, SearchError>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let context = create_context(client, question, table, options.max_context_len).await?;
    if options.debug {
        info!("Context:\n{}\n\n", context);
    }

    let mut request = client
        .completion()
        .completion_request(build_prompt(&context, question))
        .temperature(options.temperature)
        .max_tokens(options.max_tokens);
    if let Some(stop) = &options.stop_sequence {
        request = request.additional_params(json!({ "stop": [stop] }));
    }

    let response = request.send().await?;
    let text = response
        .choice
        .iter()
        .filter_map(|c| match c {
            AssistantContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<&str>>()
        .join("");

    Ok(text.trim().to_string())
}

/// Answer a question from the chunk table
///
/// Service failures are logged and returned as [`Answer::Unavailable`].
#[instrument(skip(client, table, options))]
pub async fn answer_question<C, E>(
    client: &Client<C, E>,
    question: &str,
    table: &ChunkTable,
    options: &AnswerOptions,
) -> Answer
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    match complete(client, question, table, options).await {
        Ok(text) => Answer::Answered(text),
        Err(e) => {
            warn!(error = %e, "Unable to answer question");
            Answer::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MockCompletionModel, MockEmbeddingModel};

    fn table() -> ChunkTable {
        ChunkTable::from_records(vec![
            ChunkRecord::new("Pricing starts at ten dollars.", 5, vec![0.0, 1.0]),
            ChunkRecord::new("The company was founded in 2015.", 6, vec![1.0, 0.0]),
            ChunkRecord::new("Founders met at university.", 4, vec![0.9, 0.1]),
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-12);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-12);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_rank_chunks() {
        let table = table();
        let ranked = rank_chunks(&[1.0, 0.0], &table);
        let texts: Vec<&str> = ranked.iter().map(|(_, r)| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "The company was founded in 2015.",
                "Founders met at university.",
                "Pricing starts at ten dollars.",
            ]
        );
        assert!(ranked.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_build_context_budget() {
        let table = table();
        let ranked = rank_chunks(&[1.0, 0.0], &table);

        // 6 + 4 = 10, then 4 + 4 = 18, then 5 + 4 = 27
        assert_eq!(build_context(&ranked, 9), "");
        assert_eq!(build_context(&ranked, 10), "The company was founded in 2015.");
        assert_eq!(
            build_context(&ranked, 26),
            "The company was founded in 2015.\n\n###\n\nFounders met at university."
        );
        assert_eq!(build_context(&ranked, 27).matches(CONTEXT_SEPARATOR).count(), 2);
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt("Some context", "What?");
        assert!(prompt.starts_with("Answer the question based on the context below"));
        assert!(prompt.contains("say \"I don't know\"\n\nContext: Some context\n\n---\n\n"));
        assert!(prompt.ends_with("Question: What?\nAnswer:"));
    }

    #[tokio::test]
    async fn test_create_context() {
        let embedding =
            MockEmbeddingModel::new(2).with_embedding("When was it founded?", vec![1.0, 0.0]);
        let client = Client::new(MockCompletionModel::new(), embedding);

        let context = create_context(&client, "When was it founded?", &table(), 10)
            .await
            .unwrap();
        assert_eq!(context, "The company was founded in 2015.");
    }

    #[tokio::test]
    async fn test_create_context_empty_table() {
        let client = Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(2));
        let context = create_context(&client, "Anything?", &ChunkTable::new(), 1800)
            .await
            .unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_create_context_dimension_mismatch() {
        let client = Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(3));
        let result = create_context(&client, "Anything?", &table(), 1800).await;
        assert!(matches!(result, Err(SearchError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_answer_question() {
        let completion = MockCompletionModel::new();
        completion.set_text_response("  In 2015.\n").await;
        let embedding = MockEmbeddingModel::new(2).with_embedding("When?", vec![1.0, 0.0]);
        let client = Client::new(completion.clone(), embedding);

        let answer = answer_question(&client, "When?", &table(), &AnswerOptions::default()).await;
        assert_eq!(answer, Answer::Answered("In 2015.".to_string()));
        assert_eq!(answer.text(), Some("In 2015."));
        assert_eq!(completion.calls().await, 1);
    }

    #[tokio::test]
    async fn test_answer_embedding_unavailable() {
        let completion = MockCompletionModel::new();
        let client = Client::new(
            completion.clone(),
            MockEmbeddingModel::new(2).failing("quota exceeded"),
        );

        let answer = answer_question(&client, "When?", &table(), &AnswerOptions::default()).await;
        match answer {
            Answer::Unavailable(reason) => assert!(reason.contains("quota exceeded")),
            other => panic!("Expected unavailable, got {:?}", other),
        }
        assert_eq!(completion.calls().await, 0);
    }

    #[tokio::test]
    async fn test_answer_completion_unavailable() {
        let completion = MockCompletionModel::new();
        completion.set_error("model overloaded").await;
        let client = Client::new(completion, MockEmbeddingModel::new(2));

        let answer = answer_question(&client, "When?", &table(), &AnswerOptions::default()).await;
        assert!(!answer.is_answered());
        assert!(matches!(answer, Answer::Unavailable(reason) if reason.contains("model overloaded")));
    }

    #[tokio::test]
    async fn test_answer_empty_question() {
        let client = Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(2));
        let answer = answer_question(&client, "  ", &table(), &AnswerOptions::default()).await;
        assert!(matches!(answer, Answer::Unavailable(_)));
    }
}
