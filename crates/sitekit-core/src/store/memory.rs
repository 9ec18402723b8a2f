//! In-memory [`ArticleStore`] for tests and WASM targets.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::Article;

use super::ArticleStore;

/// In-memory article list behind a `RwLock`.
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl InMemoryArticleStore {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: RwLock::new(articles),
        }
    }

    /// Replace the stored index.
    pub fn replace(&self, articles: Vec<Article>) -> Result<()> {
        let mut guard = self
            .articles
            .write()
            .map_err(|_| anyhow!("article store lock poisoned"))?;
        *guard = articles;
        Ok(())
    }
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load_articles(&self) -> Result<Vec<Article>> {
        let guard = self
            .articles
            .read()
            .map_err(|_| anyhow!("article store lock poisoned"))?;
        Ok(guard.clone())
    }
}
