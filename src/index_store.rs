//! Article index loaders.
//!
//! Two [`ArticleStore`] backends read `articles.json`:
//!
//! | Backend | `index.source` | Notes |
//! |---------|----------------|-------|
//! | [`FileArticleStore`] | a filesystem path | read on every load |
//! | [`HttpArticleStore`] | `http://` or `https://` URL | `Cache-Control: no-cache`, one attempt |
//!
//! Load results reach the renderer as an explicit [`IndexLoad`]: the
//! article list, or a [`LoadFailure`] carrying a printable message.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use sitekit_core::models::Article;
use sitekit_core::store::{parse_index, ArticleStore};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

/// Where the article index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    File(PathBuf),
    Http(String),
}

impl IndexSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            IndexSource::Http(source.to_string())
        } else {
            IndexSource::File(PathBuf::from(source))
        }
    }
}

/// Reads `articles.json` from disk.
pub struct FileArticleStore {
    path: PathBuf,
}

impl FileArticleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ArticleStore for FileArticleStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_articles(&self) -> Result<Vec<Article>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read article index: {}", self.path.display()))?;
        parse_index(&content)
            .with_context(|| format!("failed to parse article index: {}", self.path.display()))
    }
}

/// Fetches `articles.json` over HTTP, bypassing caches.
pub struct HttpArticleStore {
    client: reqwest::Client,
    url: String,
}

impl HttpArticleStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ArticleStore for HttpArticleStore {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load_articles(&self) -> Result<Vec<Article>> {
        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .with_context(|| format!("failed to fetch {}", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("failed to load articles.json: HTTP {}", status);
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response from {}", self.url))?;
        parse_index(&body).with_context(|| format!("failed to parse article index from {}", self.url))
    }
}

/// Build the store configured by `[index].source`.
pub fn store_from_config(config: &Config) -> Result<Box<dyn ArticleStore>> {
    match IndexSource::parse(&config.index.source) {
        IndexSource::File(path) => Ok(Box::new(FileArticleStore::new(path))),
        IndexSource::Http(url) => Ok(Box::new(HttpArticleStore::new(
            url,
            Duration::from_secs(config.index.timeout_secs),
        )?)),
    }
}

/// A failed index load, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
}

impl LoadFailure {
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", err),
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Success-with-data or failure-with-message.
pub type IndexLoad = std::result::Result<Vec<Article>, LoadFailure>;

/// Load the index once from `store`, folding any error into [`LoadFailure`].
pub async fn load_from(store: &dyn ArticleStore) -> IndexLoad {
    match store.load_articles().await {
        Ok(articles) => {
            debug!(source = %store.describe(), count = articles.len(), "loaded article index");
            Ok(articles)
        }
        Err(e) => {
            warn!(source = %store.describe(), error = %format!("{:#}", e), "article index unavailable");
            Err(LoadFailure::from_error(&e))
        }
    }
}

/// Load the configured index.
pub async fn load_index(config: &Config) -> IndexLoad {
    match store_from_config(config) {
        Ok(store) => load_from(store.as_ref()).await,
        Err(e) => Err(LoadFailure::from_error(&e)),
    }
}
