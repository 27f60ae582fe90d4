//! # Token Window Chunking Module
//!
//! Splits page text into chunks that fit a token budget so each chunk can be
//! embedded on its own and later packed into a bounded question context.
//!
//! ## Key Components
//!
//! - `Tokenizer`: Encodes text into token ids of a fixed vocabulary
//! - `Cl100kTokenizer`: The `cl100k_base` BPE vocabulary used by the OpenAI embedding models
//! - `preprocess_text`: Collapses runs of whitespace
//! - `split_into_many`: Fixed token-window splitting of one text
//! - `shorten_texts`: Applies `split_into_many` to every page that needs it
//!
//! ## Chunking Strategy
//!
//! A text within budget is kept whole. A longer text is cut into consecutive
//! windows of `max_tokens` tokens (the last one shorter), with no overlap and
//! no attempt to respect sentence boundaries. A window that would end inside a
//! multi-byte character is shortened to the previous character boundary.

use std::sync::LazyLock;

use regex::Regex;
use tiktoken_rs::CoreBPE;
use tracing::{debug, instrument};

use crate::processor::ChunkOptions;
use crate::processor::error::ProcessError;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Encodes text into token ids
pub trait Tokenizer {
    /// Token ids of `text`
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Text of `tokens`, or `None` if they do not form valid UTF-8
    fn decode(&self, tokens: &[u32]) -> Option<String>;

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// `cl100k_base` byte pair encoding
pub struct Cl100kTokenizer {
    bpe: CoreBPE,
}

impl Cl100kTokenizer {
    pub fn new() -> Result<Self, ProcessError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| ProcessError::Chunking(format!("Failed to load cl100k_base: {}", e)))?;
        Ok(Self { bpe })
    }
}

impl std::fmt::Debug for Cl100kTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cl100kTokenizer")
    }
}

impl Tokenizer for Cl100kTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[u32]) -> Option<String> {
        self.bpe.decode(tokens.to_vec()).ok()
    }
}

/// Collapse every run of whitespace (newlines included) into a single space
pub fn preprocess_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Split one text into consecutive windows of at most `max_tokens` tokens
///
/// Concatenating the windows gives the text back, except that whitespace-only
/// windows are dropped.
pub fn split_into_many<T: Tokenizer>(
    tokenizer: &T,
    text: &str,
    max_tokens: usize,
) -> Result<Vec<String>, ProcessError> {
    if max_tokens == 0 {
        return Err(ProcessError::Chunking(
            "max_tokens must be greater than zero".to_string(),
        ));
    }

    let tokens = tokenizer.encode(text);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < tokens.len() {
        let (end, chunk) = next_window(tokenizer, &tokens, start, max_tokens)?;
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        start = end;
    }

    Ok(chunks)
}

/// Longest window from `start` within budget that decodes on its own
///
/// Grows past the budget only when no shorter window ends on a character
/// boundary.
fn next_window<T: Tokenizer>(
    tokenizer: &T,
    tokens: &[u32],
    start: usize,
    max_tokens: usize,
) -> Result<(usize, String), ProcessError> {
    let limit = (start + max_tokens).min(tokens.len());
    let candidates = (start + 1..=limit).rev().chain(limit + 1..=tokens.len());
    for end in candidates {
        if let Some(chunk) = tokenizer.decode(&tokens[start..end]) {
            return Ok((end, chunk));
        }
    }
    Err(ProcessError::Chunking(format!(
        "tokens from {} do not decode to UTF-8",
        start
    )))
}

/// Chunk every text so that each piece fits `options.max_tokens`
///
/// Texts already within budget are kept whole. Empty texts are dropped.
#[instrument(skip(tokenizer, texts), fields(texts = texts.len()))]
pub fn shorten_texts<T: Tokenizer, S: AsRef<str>>(
    tokenizer: &T,
    texts: &[S],
    options: &ChunkOptions,
) -> Result<Vec<String>, ProcessError> {
    let mut shortened = Vec::new();

    for text in texts {
        let text = text.as_ref().trim();
        if text.is_empty() {
            continue;
        }

        if tokenizer.count(text) > options.max_tokens {
            shortened.extend(split_into_many(tokenizer, text, options.max_tokens)?);
        } else {
            shortened.push(text.to_string());
        }
    }

    debug!("Shortened {} texts into {} chunks", texts.len(), shortened.len());
    Ok(shortened)
}
