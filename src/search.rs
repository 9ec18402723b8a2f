//! Application-level search entry points.
//!
//! The ranking algorithm lives in `sitekit_core::search`. This wrapper loads
//! the configured index, applies the configured weights, and formats the
//! result for the CLI and the HTTP API.

use anyhow::{anyhow, Result};
use serde::Serialize;
use sitekit_core::models::Article;
use sitekit_core::search::{filter_articles_with, SearchOutcome, SearchQuery};

use crate::config::Config;
use crate::index_store::load_index;
use crate::render::format_date_br;

/// Owned search result, shared by `sitekit search --json` and
/// `GET /api/articles`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub articles: Vec<ScoredArticle>,
    pub total: usize,
    pub shown: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    pub score: u32,
}

impl From<&SearchOutcome<'_>> for SearchResponse {
    fn from(outcome: &SearchOutcome<'_>) -> Self {
        Self {
            articles: outcome
                .articles
                .iter()
                .map(|m| ScoredArticle {
                    article: m.article.clone(),
                    score: m.score,
                })
                .collect(),
            total: outcome.total,
            shown: outcome.shown,
        }
    }
}

/// Rank `articles` with the configured weights.
pub fn search_loaded(config: &Config, articles: &[Article], q: &str, tag: &str) -> SearchResponse {
    let outcome = filter_articles_with(
        articles,
        &SearchQuery::new(q, tag),
        &config.search.weights(),
    );
    SearchResponse::from(&outcome)
}

/// Load the configured index and rank it.
///
/// A load failure is returned as an error carrying the failure message.
pub async fn search_articles(config: &Config, q: &str, tag: &str) -> Result<SearchResponse> {
    let articles = load_index(config).await.map_err(|f| anyhow!(f.message))?;
    Ok(search_loaded(config, &articles, q, tag))
}

/// CLI entry point for `sitekit search`.
pub async fn run_search(config: &Config, q: &str, tag: &str, json: bool) -> Result<()> {
    let response = search_articles(config, q, tag).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.articles.is_empty() {
        println!("No results. (total: {}, shown: 0)", response.total);
        return Ok(());
    }

    for (i, r) in response.articles.iter().enumerate() {
        println!(
            "{}. [{}] {} - {}",
            i + 1,
            r.score,
            format_date_br(&r.article.date),
            r.article.title
        );
        if !r.article.tags().is_empty() {
            println!("    tags: {}", r.article.tags().join(", "));
        }
        println!("    link: {}", r.article.link);
        let desc = r.article.description();
        if !desc.is_empty() {
            println!("    {}", desc);
        }
        println!();
    }
    println!("total: {}, shown: {}", response.total, response.shown);

    Ok(())
}
