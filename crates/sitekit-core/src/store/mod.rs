//! Article store abstraction.
//!
//! The [`ArticleStore`] trait is the seam between the search engine and
//! wherever the article index lives: a JSON file on disk, an HTTP endpoint
//! serving `articles.json`, or an in-memory list in tests.
//!
//! A store performs a single fetch per call. There is no retry or caching
//! layer; a failed load is surfaced to the caller, which hands it to the
//! renderer as an explicit failure.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Article;

/// Source of the raw article index.
///
/// Implementations must be `Send + Sync` so the HTTP server can share one
/// store across handler tasks.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Short label for logs and error messages (a path or URL).
    fn describe(&self) -> String;

    /// Load every article record, in index order.
    async fn load_articles(&self) -> Result<Vec<Article>>;
}

/// Parse an `articles.json` document (a top-level JSON array).
pub fn parse_index(json: &str) -> Result<Vec<Article>> {
    let articles: Vec<Article> = serde_json::from_str(json)?;
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_array() {
        let json = r#"[
            {"title": "A", "date": "2024-01-01", "link": "/a"},
            {"title": "B", "description": "b", "date": "2024-01-02", "tags": ["x"], "link": "/b"}
        ]"#;
        let articles = parse_index(json).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].tags(), &["x".to_string()]);
    }

    #[test]
    fn test_parse_index_rejects_object() {
        assert!(parse_index(r#"{"title": "A"}"#).is_err());
    }

    #[test]
    fn test_parse_index_requires_title_and_link() {
        assert!(parse_index(r#"[{"date": "2024-01-01", "link": "/a"}]"#).is_err());
        assert!(parse_index(r#"[{"title": "A", "date": "2024-01-01"}]"#).is_err());
    }
}
