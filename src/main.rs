//! # sitesage CLI Application
//!
//! Command-line interface for the crawl, embed and ask pipeline.
//!
//! ## Subcommands
//!
//! - `crawl`: Crawl one domain from a seed URL and store each page's text
//! - `embed`: Chunk and embed the stored pages of a domain into a chunk table
//! - `ask`: Answer a question from a chunk table
//!
//! The embedding and completion provider is chosen with `--provider`; its API
//! key is read from `OPENAI_API_KEY` or `GEMINI_API_KEY`. Model names default
//! per provider and can be overridden with `--model` and `--embedding-model`.

mod telemetry;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use sitesage::crawler::{ContentStore, CrawlerConfig, StorageConfig, TraversalOrder};
use sitesage::index::ChunkTable;
use sitesage::model::{self, Client, GeminiClient, OpenAiClient};
use sitesage::processor::ProcessorConfig;
use sitesage::search::{Answer, AnswerOptions};
use tokio::sync::mpsc;
use tracing::{instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Crawl a website and answer questions about it", long_about = None)]
struct Cli {
    /// Embedding and completion provider
    #[arg(long, global = true, value_enum, default_value_t = Provider::OpenAi)]
    provider: Provider,

    /// Also write logs to sitesage.log in this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Provider {
    #[value(name = "openai")]
    OpenAi,
    Gemini,
}

impl Provider {
    fn default_completion_model(self) -> &'static str {
        match self {
            Provider::OpenAi => model::OPENAI_COMPLETION_MODEL,
            Provider::Gemini => model::GEMINI_COMPLETION_MODEL,
        }
    }

    fn default_embedding_model(self) -> &'static str {
        match self {
            Provider::OpenAi => model::OPENAI_EMBEDDING_MODEL,
            Provider::Gemini => model::GEMINI_EMBEDDING_MODEL,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a website and save the text of every page
    Crawl(CrawlArgs),

    /// Chunk and embed the crawled pages of a domain
    Embed(EmbedArgs),

    /// Answer a question from the embedded chunks
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to start crawling from
    #[arg(required = true)]
    url: String,

    /// Directory holding one sub-directory of pages per domain
    #[arg(short, long, default_value = "text")]
    output_dir: PathBuf,

    /// Visit the most recently discovered page first
    #[arg(long)]
    depth_first: bool,
}

#[derive(Args, Debug)]
struct EmbedArgs {
    /// Domain whose pages are embedded
    #[arg(required = true)]
    domain: String,

    /// Directory the crawl wrote to
    #[arg(short, long, default_value = "text")]
    input_dir: PathBuf,

    /// Chunk table to write
    #[arg(short, long, default_value = "processed/embeddings.csv")]
    output: PathBuf,

    /// Maximum tokens per chunk
    #[arg(short, long, default_value = "500")]
    max_tokens: usize,

    /// Embedding model (default depends on the provider)
    #[arg(long)]
    embedding_model: Option<String>,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question to answer
    #[arg(required = true)]
    question: String,

    /// Chunk table to search
    #[arg(short, long, default_value = "processed/embeddings.csv")]
    table: PathBuf,

    /// Token budget of the context
    #[arg(long, default_value = "1800")]
    max_len: usize,

    /// Maximum tokens in the answer
    #[arg(long, default_value = "150")]
    max_tokens: u64,

    /// Log the context sent to the completion model
    #[arg(short, long)]
    debug: bool,

    /// Completion model answering the question (default depends on the provider)
    #[arg(short, long)]
    model: Option<String>,

    /// Embedding model, must match the one the table was built with
    #[arg(long)]
    embedding_model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing_subscriber(cli.log_file.as_deref())?;

    let provider = cli.provider;
    match cli.command {
        Commands::Crawl(args) => crawl_command(args).await?,
        Commands::Embed(args) => {
            let completion = provider.default_completion_model();
            let embedding = args
                .embedding_model
                .clone()
                .unwrap_or_else(|| provider.default_embedding_model().to_string());
            match provider {
                Provider::OpenAi => {
                    let client = OpenAiClient::new_openai_from_env(completion, &embedding)?;
                    embed_command(&client, args).await?
                }
                Provider::Gemini => {
                    let client = GeminiClient::new_gemini_from_env(completion, &embedding)?;
                    embed_command(&client, args).await?
                }
            }
        }
        Commands::Ask(args) => {
            let completion = args
                .model
                .clone()
                .unwrap_or_else(|| provider.default_completion_model().to_string());
            let embedding = args
                .embedding_model
                .clone()
                .unwrap_or_else(|| provider.default_embedding_model().to_string());
            match provider {
                Provider::OpenAi => {
                    let client = OpenAiClient::new_openai_from_env(&completion, &embedding)?;
                    ask_command(&client, args).await?
                }
                Provider::Gemini => {
                    let client = GeminiClient::new_gemini_from_env(&completion, &embedding)?;
                    ask_command(&client, args).await?
                }
            }
        }
    }

    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    println!("Crawling {}...", args.url);

    let traversal = if args.depth_first {
        TraversalOrder::DepthFirst
    } else {
        TraversalOrder::BreadthFirst
    };
    let config = CrawlerConfig::builder()
        .seed_url(args.url.clone())
        .traversal(traversal)
        .build();
    let storage = StorageConfig {
        base_path: args.output_dir.clone(),
    };

    let report = sitesage::crawler::crawl_website(config, storage).await?;

    println!(
        "Crawled {} pages from {}, wrote {} to {}",
        report.fetched.len(),
        report.domain,
        report.written.len(),
        args.output_dir.join(&report.domain).display()
    );
    if !report.skipped_non_html.is_empty() {
        println!("Skipped {} non-HTML pages", report.skipped_non_html.len());
    }
    if !report.javascript_pages.is_empty() {
        println!(
            "Skipped {} pages requiring JavaScript",
            report.javascript_pages.len()
        );
    }
    for (url, reason) in &report.failed {
        println!("Failed {}: {}", url, reason);
    }
    for (url, reason) in &report.write_failed {
        println!("Not stored {}: {}", url, reason);
    }
    println!("Finished in {}", report.finished_at - report.started_at);

    Ok(())
}

#[instrument(skip(client))]
async fn embed_command<C, E>(client: &Client<C, E>, args: EmbedArgs) -> anyhow::Result<()>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let store = ContentStore::with_config(StorageConfig {
        base_path: args.input_dir.clone(),
    });
    let config = ProcessorConfig::builder().max_tokens(args.max_tokens).build();

    let (progress_sender, mut progress_receiver) = mpsc::channel(100);

    let progress_bar = ProgressBar::no_length();
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {spinner} {pos} chunks embedded {msg}")
            .map_err(|e| anyhow!("Invalid progress template: {}", e))?,
    );
    progress_bar.set_message(format!("for {}", args.domain));

    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(count) = progress_receiver.recv().await {
                progress_bar.inc(count as u64);
            }
            progress_bar.finish_with_message("done");
        }
    });

    let table = sitesage::processor::embed_domain(
        client,
        &store,
        &args.domain,
        &config,
        Some(progress_sender),
    )
    .await?;

    // Ends once the sender is dropped with the pipeline
    if let Err(e) = progress_handle.await {
        warn!("Progress reporting task failed: {}", e);
    }

    table.save(&args.output)?;
    println!(
        "Wrote {} chunks to {}",
        table.len(),
        args.output.display()
    );

    Ok(())
}

#[instrument(skip(client))]
async fn ask_command<C, E>(client: &Client<C, E>, args: AskArgs) -> anyhow::Result<()>
where
    C: CompletionModel,
    E: EmbeddingModel,
{
    let table = ChunkTable::load(&args.table)?;
    let options = AnswerOptions {
        max_context_len: args.max_len,
        max_tokens: args.max_tokens,
        debug: args.debug,
        ..AnswerOptions::default()
    };

    match sitesage::search::answer_question(client, &args.question, &table, &options).await {
        Answer::Answered(text) => {
            println!("{}", text);
            Ok(())
        }
        Answer::Unavailable(reason) => Err(anyhow!("No answer available: {}", reason)),
    }
}
