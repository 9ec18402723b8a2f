//! HTML rendering for article listings and code blocks.
//!
//! The renderer is the only place that produces markup. It consumes the
//! engine's [`SearchOutcome`] (or a [`LoadFailure`]) and escapes every
//! field taken from the index or the query string.
//!
//! Copy is in Brazilian Portuguese and dates use the `DD/MM/YYYY` format,
//! matching the site.

use chrono::Datelike;
use sitekit_core::codeblock::dedent;
use sitekit_core::models::Article;
use sitekit_core::search::{
    filter_articles_with, parse_article_date, ScoreWeights, SearchOutcome, SearchQuery,
};

use crate::index_store::{IndexLoad, LoadFailure};

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `YYYY-MM-DD` → `DD/MM/YYYY`; anything unparsable is returned as-is.
pub fn format_date_br(date: &str) -> String {
    match parse_article_date(date) {
        Some(d) => format!("{:02}/{:02}/{:04}", d.day(), d.month(), d.year()),
        None => date.to_string(),
    }
}

/// One `<article class="article-card">`.
pub fn article_card(article: &Article) -> String {
    let tags = if article.tags().is_empty() {
        String::new()
    } else {
        let items: String = article
            .tags()
            .iter()
            .map(|t| format!("<li>{}</li>", escape_html(t)))
            .collect();
        format!("<ul class=\"article-tags\">{}</ul>", items)
    };

    format!(
        "<article class=\"article-card\">\n  \
         <h2 class=\"article-title\"><a href=\"{link}\">{title}</a></h2>\n  \
         <div class=\"article-meta\">\n    \
         <time datetime=\"{date_attr}\">{date}</time>\n  \
         </div>\n  \
         <p class=\"article-desc\">{desc}</p>\n  \
         {tags}\n\
         </article>\n",
        link = escape_html(&article.link),
        title = escape_html(&article.title),
        date_attr = escape_html(&article.date),
        date = escape_html(&format_date_br(&article.date)),
        desc = escape_html(article.description()),
        tags = tags,
    )
}

/// Human-readable summary of a search, e.g.
/// `Mostrando 1 de 2 artigos para "guide" com a tag "rust"`.
pub fn status_line(total: usize, shown: usize, q: &str, tag: &str) -> String {
    let noun = if total == 1 { "artigo" } else { "artigos" };
    let mut line = format!("Mostrando {} de {} {}", shown, total, noun);
    if !q.trim().is_empty() {
        line.push_str(&format!(" para \"{}\"", q.trim()));
    }
    if !tag.trim().is_empty() {
        line.push_str(&format!(" com a tag \"{}\"", tag.trim()));
    }
    line
}

/// Search form reflecting the current query back into its input.
pub fn search_form(q: &str, tag: &str) -> String {
    let hidden_tag = if tag.is_empty() {
        String::new()
    } else {
        format!(
            "<input type=\"hidden\" name=\"tag\" value=\"{}\">",
            escape_html(tag)
        )
    };
    format!(
        "<form class=\"article-search\" method=\"get\" role=\"search\">\
         <input type=\"search\" name=\"q\" value=\"{}\" placeholder=\"Buscar artigos\" aria-label=\"Buscar artigos\">\
         {}<button type=\"submit\">Buscar</button></form>\n",
        escape_html(q),
        hidden_tag
    )
}

/// Alert shown when the index could not be loaded.
pub fn error_alert(failure: &LoadFailure) -> String {
    format!(
        "<div class=\"alert\">\n  \
         <p>Não foi possível carregar os artigos agora.</p>\n  \
         <pre style=\"white-space:pre-wrap\">{}</pre>\n\
         </div>\n",
        escape_html(&failure.message)
    )
}

/// Cards for every match, or an empty-state paragraph.
pub fn render_cards(outcome: &SearchOutcome<'_>) -> String {
    if outcome.articles.is_empty() {
        return "<p class=\"articles-empty\">Nenhum artigo encontrado.</p>\n".to_string();
    }
    outcome
        .articles
        .iter()
        .map(|m| article_card(m.article))
        .collect()
}

/// Full listing: form, status line, and cards, or the failure alert.
pub fn render_listing(load: &IndexLoad, query: &SearchQuery<'_>, weights: &ScoreWeights) -> String {
    match load {
        Ok(articles) => {
            let outcome = filter_articles_with(articles, query, weights);
            let mut html = search_form(query.q, query.tag);
            html.push_str(&format!(
                "<p class=\"search-status\" role=\"status\">{}</p>\n",
                escape_html(&status_line(outcome.total, outcome.shown, query.q, query.tag))
            ));
            html.push_str(&render_cards(&outcome));
            html
        }
        Err(failure) => error_alert(failure),
    }
}

/// A `<pre><code>` block with its indentation removed and a copy button.
///
/// The button carries the clipboard text in `data-copy`.
pub fn code_block(lang: Option<&str>, code: &str) -> String {
    let text = dedent(code);
    let class = lang
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!(" class=\"language-{}\"", escape_html(l.trim())))
        .unwrap_or_default();
    format!(
        "<div class=\"code-block\">\
         <button type=\"button\" class=\"btn-copy\" data-copy=\"{copy}\" aria-label=\"Copiar código\">\
         <i class=\"bi bi-clipboard\"></i></button>\
         <pre><code{class}>{code}</code></pre></div>\n",
        copy = escape_html(&text),
        class = class,
        code = escape_html(&text),
    )
}
