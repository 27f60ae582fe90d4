//! # Question Answering Module
//!
//! This module answers natural-language questions from an embedded chunk
//! table. It is the retrieval half of the pipeline: the question is embedded,
//! chunks are ranked by cosine distance, the closest are packed into a
//! bounded context and the completion model answers from that context only.
//!
//! ## Key Components
//!
//! - `answer_question`: End-to-end question answering returning an [`Answer`]
//! - `create_context`: Embedding, ranking and context assembly
//! - `rank_chunks` / `build_context`: The pure retrieval steps
//! - `AnswerOptions`: Context budget and generation settings
//!
//! ## Failure Handling
//!
//! The embedding and completion services are both fallible. Their failures
//! never propagate out of `answer_question`; they are logged and returned as
//! [`Answer::Unavailable`] so callers can tell an outage from a model that
//! answered "I don't know".

mod answer;
mod error;

pub use answer::{
    Answer, AnswerOptions, CONTEXT_SEPARATOR, answer_question, build_context, build_prompt,
    cosine_distance, create_context, rank_chunks,
};
pub use error::SearchError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_options_default() {
        let options = AnswerOptions::default();

        assert_eq!(options.max_context_len, 1800);
        assert_eq!(options.max_tokens, 150);
        assert_eq!(options.temperature, 0.0);
        assert!(options.stop_sequence.is_none());
        assert!(!options.debug);
    }

    #[test]
    fn test_answer_serializes() {
        let answer = Answer::Unavailable("offline".to_string());
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["Unavailable"], "offline");
    }
}
