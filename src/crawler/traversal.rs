//! Frontier-driven traversal of a single domain
//!
//! The crawl owns its frontier and seen set outright: one fetch is in flight at
//! a time and nothing else touches either collection. A URL enters the seen set
//! at the moment it is enqueued, so no URL is ever enqueued (or fetched) twice.

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawler::content::{extract_text, requires_javascript};
use crate::crawler::error::CrawlError;
use crate::crawler::fetch::{FetchedPage, HttpFetcher, PageFetcher};
use crate::crawler::links::{extract_hyperlinks, is_html};
use crate::crawler::normalize::{canonicalize, domain_of, validate_domain_hyperlinks};
use crate::crawler::storage::{ContentStore, StorageConfig};
use crate::crawler::{CrawlReport, CrawlerConfig, TraversalOrder};

/// URLs discovered but not yet fetched
#[derive(Debug)]
struct Frontier {
    order: TraversalOrder,
    queue: VecDeque<String>,
}

impl Frontier {
    fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            queue: VecDeque::new(),
        }
    }

    fn push(&mut self, url: String) {
        self.queue.push_back(url);
    }

    fn pop(&mut self) -> Option<String> {
        match self.order {
            TraversalOrder::BreadthFirst => self.queue.pop_front(),
            TraversalOrder::DepthFirst => self.queue.pop_back(),
        }
    }
}

/// What happened to a fetched page
#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    Written,
    NotHtml,
    RequiresJavascript,
}

/// Single-domain crawler
#[derive(Debug)]
pub struct Crawler<F> {
    config: CrawlerConfig,
    fetcher: F,
    store: ContentStore,
    domain: String,
    seed: String,
}

impl Crawler<HttpFetcher> {
    /// Create a crawler that fetches over HTTP
    pub fn with_http(config: CrawlerConfig, store: ContentStore) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::new(config, fetcher, store)
    }
}

impl<F: PageFetcher> Crawler<F> {
    /// Create a crawler
    ///
    /// Fails with [`CrawlError::InvalidSeed`] unless the seed is an absolute
    /// http(s) URL with a host.
    pub fn new(config: CrawlerConfig, fetcher: F, store: ContentStore) -> Result<Self, CrawlError> {
        let parsed = Url::parse(&config.seed_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidSeed(config.seed_url.clone()));
        }
        let domain = domain_of(&config.seed_url)
            .ok_or_else(|| CrawlError::InvalidSeed(config.seed_url.clone()))?;
        // The seed goes through the same canonical form as discovered links so a
        // self-link back to the home page is recognized as seen.
        let seed = canonicalize(&domain, &config.seed_url).unwrap_or_else(|| config.seed_url.clone());

        Ok(Self {
            config,
            fetcher,
            store,
            domain,
            seed,
        })
    }

    /// Domain this crawler is confined to
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Canonical seed URL
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Run the crawl until the frontier is empty
    #[instrument(skip(self), fields(domain = %self.domain))]
    pub async fn crawl(&self) -> Result<CrawlReport, CrawlError> {
        info!("Starting crawl from {}", self.seed);
        self.store.ensure_dirs(&self.domain).await?;

        let mut report = CrawlReport::new(&self.domain, Utc::now());
        let mut frontier = Frontier::new(self.config.traversal);
        let mut seen: HashSet<String> = HashSet::new();
        let mut written_paths: HashSet<PathBuf> = HashSet::new();
        seen.insert(self.seed.clone());
        frontier.push(self.seed.clone());

        while let Some(url) = frontier.pop() {
            info!(url = %url, "Crawling");

            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(e) if e.is_fetch_error() && self.config.continue_on_fetch_error => {
                    warn!("Failed to fetch {}: {}", url, e);
                    report.failed.push((url, e.to_string()));
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.fetched.push(url.clone());

            match self.persist(&url, &page, &mut written_paths).await {
                Ok(PageOutcome::Written) => report.written.push(url.clone()),
                Ok(PageOutcome::NotHtml) => {
                    report.skipped_non_html.push(url.clone());
                    continue;
                }
                Ok(PageOutcome::RequiresJavascript) => report.javascript_pages.push(url.clone()),
                // The page itself was fetched, so its links are still followed
                Err(e) if e.is_write_error() => {
                    warn!("Failed to store {}: {}", url, e);
                    report.write_failed.push((url.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }

            let raw_links = extract_hyperlinks(page.content_type.as_deref(), &page.body);
            let links = validate_domain_hyperlinks(&self.domain, &raw_links);
            let mut discovered = 0;
            for link in links {
                if seen.insert(link.clone()) {
                    frontier.push(link);
                    discovered += 1;
                }
            }
            debug!(
                "{} yielded {} raw links, {} new",
                url,
                raw_links.len(),
                discovered
            );
        }

        report.finished_at = Utc::now();
        info!(
            "Crawl finished: {} fetched, {} written, {} failed, {} not stored",
            report.fetched.len(),
            report.written.len(),
            report.failed.len(),
            report.write_failed.len()
        );
        Ok(report)
    }

    /// Write the text of an HTML page unless it is a script-only interstitial
    ///
    /// A file is written at most once per crawl; a second URL mapping to the
    /// same file is a [`CrawlError::FileCollision`].
    async fn persist(
        &self,
        url: &str,
        page: &FetchedPage,
        written_paths: &mut HashSet<PathBuf>,
    ) -> Result<PageOutcome, CrawlError> {
        if !is_html(page.content_type.as_deref()) {
            debug!(
                "Skipping {}: content type {:?} is not HTML",
                url, page.content_type
            );
            return Ok(PageOutcome::NotHtml);
        }

        let text = extract_text(&page.body);
        if requires_javascript(&text, &self.config.javascript_marker) {
            warn!("Unable to parse page {} due to JavaScript being required", url);
            return Ok(PageOutcome::RequiresJavascript);
        }

        let path = self.store.path_for(&self.domain, url);
        if !written_paths.insert(path.clone()) {
            return Err(CrawlError::FileCollision {
                url: url.to_string(),
                path,
            });
        }
        self.store.store(&self.domain, url, &text).await?;
        Ok(PageOutcome::Written)
    }
}

/// Crawl a website over HTTP and write its pages to the content store
///
/// # Arguments
///
/// * `config` - The crawler configuration, including the seed URL
/// * `storage` - Where page text is written
///
/// # Returns
///
/// A report of every URL fetched, written, skipped or failed
pub async fn crawl_website(
    config: CrawlerConfig,
    storage: StorageConfig,
) -> Result<CrawlReport, CrawlError> {
    let crawler = Crawler::with_http(config, ContentStore::with_config(storage))?;
    crawler.crawl().await
}
