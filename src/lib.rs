//! # sitesage - Question answering over a single crawled website
//!
//! This crate crawls one web domain, turns every reachable HTML page into plain
//! text, splits that text into token-bounded chunks, embeds each chunk and
//! answers natural-language questions by retrieving the closest chunks and
//! handing them to a completion model.
//!
//! ## Pipeline
//!
//! - [`crawler`]: domain-scoped traversal from a seed URL, writing one text file per page
//! - [`processor`]: whitespace cleanup, token-bounded chunking and embedding
//! - [`index`]: the persisted chunk table (`text`, `n_tokens`, `embeddings`)
//! - [`search`]: context assembly and answer generation
//!
//! Each stage is an independent batch job; the filesystem is the handoff.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitesage::crawler::{CrawlerConfig, StorageConfig, crawl_website};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlerConfig::builder()
//!         .seed_url("https://example.com/")
//!         .build();
//!
//!     let report = crawl_website(config, StorageConfig::default()).await?;
//!     println!("wrote {} pages", report.written.len());
//!     Ok(())
//! }
//! ```

mod error;
pub mod model;

pub mod crawler;
pub mod index;
pub mod processor;
pub mod search;

pub use error::{Error, Result};
