//! Content store for crawled pages
//!
//! One UTF-8 text file per crawled HTML page, written once and never updated
//! during a run. Files live under `<base_path>/<domain>/` and are named after
//! the canonical URL with its scheme removed and every `/` replaced by `_`.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::crawler::error::CrawlError;

/// Extension appended to every stored page
pub const TEXT_EXTENSION: &str = "txt";

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base path for storage
    pub base_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("text"),
        }
    }
}

/// File name under which a canonical URL is stored
///
/// `https://example.com/docs/intro` becomes `example.com_docs_intro.txt`.
pub fn file_name_for(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    format!("{}.{}", without_scheme.replace('/', "_"), TEXT_EXTENSION)
}

type Result<T> = std::result::Result<T, CrawlError>;

/// Filesystem-backed content store
#[derive(Debug, Clone)]
pub struct ContentStore {
    config: StorageConfig,
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore {
    /// Create a new store with default configuration
    pub fn new() -> Self {
        Self {
            config: StorageConfig::default(),
        }
    }

    /// Create a new store with custom configuration
    pub fn with_config(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Directory holding the pages of one domain
    pub fn domain_dir(&self, domain: &str) -> PathBuf {
        self.config.base_path.join(domain)
    }

    /// Full path at which a URL's text is stored
    pub fn path_for(&self, domain: &str, url: &str) -> PathBuf {
        self.domain_dir(domain).join(file_name_for(url))
    }

    /// Create the domain directory if needed
    pub async fn ensure_dirs(&self, domain: &str) -> Result<()> {
        fs::create_dir_all(self.domain_dir(domain)).await?;
        Ok(())
    }

    /// Write the text of one page
    pub async fn store(&self, domain: &str, url: &str, text: &str) -> Result<PathBuf> {
        let path = self.path_for(domain, url);
        fs::write(&path, text).await?;
        debug!("Stored {} bytes for {} at {}", text.len(), url, path.display());
        Ok(path)
    }

    /// Load every stored page of a domain as `(file name, text)` pairs
    ///
    /// Pairs are sorted by file name. Files without the text extension are ignored.
    pub async fn load_texts(&self, domain: &str) -> Result<Vec<(String, String)>> {
        let dir = self.domain_dir(domain);
        if !fs::try_exists(&dir).await? {
            return Err(CrawlError::Storage(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No pages found for domain {} in {}", domain, dir.display()),
            )));
        }

        let mut texts = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !has_text_extension(&path) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
                warn!("Skipping non UTF-8 file name {}", path.display());
                continue;
            };
            let text = fs::read_to_string(&path).await?;
            texts.push((file_name.to_string(), text));
        }

        texts.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(texts)
    }
}

fn has_text_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEXT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_for() {
        assert_eq!(file_name_for("https://www.google.com"), "www.google.com.txt");
        assert_eq!(
            file_name_for("https://www.google.com/search"),
            "www.google.com_search.txt"
        );
        assert_eq!(
            file_name_for("https://openai.com/blog/post-1"),
            "openai.com_blog_post-1.txt"
        );
        assert_eq!(file_name_for("http://example.com/a/b"), "example.com_a_b.txt");
    }

    #[test]
    fn test_path_for() {
        let store = ContentStore::new();
        assert_eq!(
            store.path_for("example.com", "https://example.com/docs"),
            Path::new("text/example.com/example.com_docs.txt")
        );

        let store = ContentStore::with_config(StorageConfig {
            base_path: PathBuf::from("/tmp/pages"),
        });
        assert_eq!(
            store.path_for("example.com", "https://example.com"),
            Path::new("/tmp/pages/example.com/example.com.txt")
        );
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::with_config(StorageConfig {
            base_path: dir.path().to_path_buf(),
        });

        store.ensure_dirs("example.com").await.unwrap();
        store
            .store("example.com", "https://example.com/b", "second")
            .await
            .unwrap();
        store
            .store("example.com", "https://example.com/a", "first")
            .await
            .unwrap();
        std::fs::write(store.domain_dir("example.com").join("notes.md"), "ignored").unwrap();

        let texts = store.load_texts("example.com").await.unwrap();
        assert_eq!(
            texts,
            vec![
                ("example.com_a.txt".to_string(), "first".to_string()),
                ("example.com_b.txt".to_string(), "second".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_missing_domain() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::with_config(StorageConfig {
            base_path: dir.path().to_path_buf(),
        });

        match store.load_texts("example.com").await {
            Err(CrawlError::Storage(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                assert!(e.to_string().contains("example.com"));
            }
            other => panic!("Expected NotFound storage error, got {:?}", other),
        }
    }
}
