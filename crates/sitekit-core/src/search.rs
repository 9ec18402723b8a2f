//! Article search, tag filtering, and relevance ranking.
//!
//! The engine is a pure function of `(articles, q, tag)`. It borrows the
//! input slice, never mutates it, and keeps no state between calls, so the
//! HTTP server can run it concurrently against one shared index snapshot.
//!
//! # Algorithm
//!
//! 1. Stable-sort a working list of references by date, newest first.
//!    Dates that do not parse as `YYYY-MM-DD` sort after every valid date
//!    and keep their input order among themselves.
//! 2. Keep articles whose tags match the tag filter. `total` = survivors.
//! 3. Tokenize `q`.
//! 4. With tokens: score each survivor, drop zero scores, stable-sort by
//!    score descending (ties keep date order).
//! 5. Without tokens: keep every survivor in date order, score 0.
//! 6. `shown` = length of the final list.
//!
//! # Scoring
//!
//! Each token is tested independently by substring containment against the
//! normalized title, the normalized space-joined tags, and the normalized
//! description. Hits add [`ScoreWeights::title`], [`ScoreWeights::tags`]
//! and [`ScoreWeights::description`] respectively (3/2/1 by default); one
//! token may hit all three fields.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;

use crate::models::Article;
use crate::normalize::{normalize, tokenize};

/// Per-field weights added for every token hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub title: u32,
    pub tags: u32,
    pub description: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title: 3,
            tags: 2,
            description: 1,
        }
    }
}

/// Query parameters for one engine invocation.
///
/// Absent URL parameters map to `""`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchQuery<'a> {
    /// Free-text search string.
    pub q: &'a str,
    /// Single tag filter (exact or substring match).
    pub tag: &'a str,
}

impl<'a> SearchQuery<'a> {
    pub fn new(q: &'a str, tag: &'a str) -> Self {
        Self { q, tag }
    }
}

/// An article that passed both filters, with its relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleMatch<'a> {
    #[serde(flatten)]
    pub article: &'a Article,
    /// Relevance score; always 0 when the query had no tokens.
    pub score: u32,
}

/// Engine output handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome<'a> {
    /// Ranked matches.
    pub articles: Vec<ArticleMatch<'a>>,
    /// Number of articles passing the tag filter, before text scoring.
    pub total: usize,
    /// Number of articles passing both filters.
    pub shown: usize,
}

/// Parse an article date (`YYYY-MM-DD`), ignoring surrounding whitespace.
pub fn parse_article_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Stable-sort article references by date, newest first.
///
/// Unparsable dates sort after every valid date and share one key, so they
/// keep their input order among themselves.
pub fn sort_by_date_desc(articles: &mut [&Article]) {
    articles.sort_by_cached_key(|a| {
        let date = parse_article_date(&a.date);
        (date.is_none(), Reverse(date))
    });
}

/// Returns true if any of the article's tags contains `normalized_tag`.
///
/// `normalized_tag` must already be passed through [`normalize`]. An empty
/// filter matches every article. Substring containment subsumes the exact
/// match case.
pub fn tag_matches(article: &Article, normalized_tag: &str) -> bool {
    if normalized_tag.is_empty() {
        return true;
    }
    article
        .tags()
        .iter()
        .any(|t| normalize(t).contains(normalized_tag))
}

/// Relevance of one article for a token list. Zero when `tokens` is empty.
pub fn score_article(article: &Article, tokens: &[String], weights: &ScoreWeights) -> u32 {
    if tokens.is_empty() {
        return 0;
    }

    let title = normalize(&article.title);
    let tags = normalize(&article.tags().join(" "));
    let description = normalize(article.description());

    tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| {
            let mut s = 0u32;
            if title.contains(t.as_str()) {
                s = s.saturating_add(weights.title);
            }
            if tags.contains(t.as_str()) {
                s = s.saturating_add(weights.tags);
            }
            if description.contains(t.as_str()) {
                s = s.saturating_add(weights.description);
            }
            s
        })
        .fold(0u32, u32::saturating_add)
}

/// Filter and rank `articles` with the default 3/2/1 weights.
pub fn filter_articles<'a>(articles: &'a [Article], query: &SearchQuery<'_>) -> SearchOutcome<'a> {
    filter_articles_with(articles, query, &ScoreWeights::default())
}

/// Filter and rank `articles` with explicit weights.
///
/// Weights of zero would let a matching token contribute nothing; callers
/// that take weights from configuration reject that up front.
pub fn filter_articles_with<'a>(
    articles: &'a [Article],
    query: &SearchQuery<'_>,
    weights: &ScoreWeights,
) -> SearchOutcome<'a> {
    let mut working: Vec<&Article> = articles.iter().collect();
    sort_by_date_desc(&mut working);

    let tag = normalize(query.tag);
    working.retain(|a| tag_matches(a, &tag));
    let total = working.len();

    let tokens = tokenize(query.q);

    let matches: Vec<ArticleMatch<'a>> = if tokens.is_empty() {
        working
            .into_iter()
            .map(|article| ArticleMatch { article, score: 0 })
            .collect()
    } else {
        let mut scored: Vec<ArticleMatch<'a>> = working
            .into_iter()
            .map(|article| ArticleMatch {
                article,
                score: score_article(article, &tokens, weights),
            })
            .filter(|m| m.score > 0)
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    };

    let shown = matches.len();
    SearchOutcome {
        articles: matches,
        total,
        shown,
    }
}
