//! `sitekit build`: render site pages into the output directory.
//!
//! Walks `[site].root`, selects pages with the include/exclude globs, fills
//! partial placeholders and the year, renders the default article listing
//! into pages that have an `id="articles-list"` container, gives every
//! `<pre><code>` block a copy button, and writes the result under
//! `[site].out_dir` with the same relative paths.
//!
//! The index is loaded once per build. A load failure does not stop the
//! build; listing pages get the failure alert instead.

use anyhow::{bail, Result};
use chrono::Datelike;
use globset::{Glob, GlobSet, GlobSetBuilder};
use sitekit_core::search::SearchQuery;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::index_store::load_index;
use crate::page::{load_partials, Page};
use crate::render::render_listing;

/// Counts reported at the end of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub listings: usize,
    pub code_blocks: usize,
    pub index_failed: bool,
}

/// Select the page files to build, sorted by relative path.
pub fn collect_pages(config: &Config) -> Result<Vec<PathBuf>> {
    let root = &config.site.root;
    if !root.exists() {
        bail!("Site root does not exist: {}", root.display());
    }

    let include_set = build_globset(&config.site.include_globs)?;

    let mut excludes = vec![
        "**/.git/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    let partials_rel = config.site.partials_dir.to_string_lossy().replace('\\', "/");
    let partials_rel = partials_rel.trim_start_matches("./").trim_end_matches('/');
    if !partials_rel.is_empty() {
        excludes.push(format!("{}/**", partials_rel));
    }
    excludes.extend(config.site.exclude_globs.clone());
    let exclude_set = build_globset(&excludes)?;

    let mut pages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }
        pages.push(relative.to_path_buf());
    }

    pages.sort();
    Ok(pages)
}

/// Build every selected page into `[site].out_dir`.
pub async fn build_site(config: &Config, year: i32) -> Result<BuildStats> {
    let pages = collect_pages(config)?;
    let partials = load_partials(&config.site.partials_path())?;

    let load = load_index(config).await;
    let mut stats = BuildStats {
        index_failed: load.is_err(),
        ..BuildStats::default()
    };
    let listing = render_listing(&load, &SearchQuery::default(), &config.search.weights());

    for rel in &pages {
        let src = config.site.root.join(rel);
        let html = std::fs::read_to_string(&src)?;
        let mut page = Page::parse(&html);
        page.inject_partials(&partials)?;
        page.stamp_year(year)?;
        if page.inject_listing(&listing)? {
            stats.listings += 1;
        }
        stats.code_blocks += page.enhance_code_blocks()?;

        let dest = config.site.out_dir.join(rel);
        write_page(&dest, &page.to_html())?;
        debug!(page = %rel.display(), "built page");
        stats.pages += 1;
    }

    info!(
        pages = stats.pages,
        listings = stats.listings,
        code_blocks = stats.code_blocks,
        out_dir = %config.site.out_dir.display(),
        "site build finished"
    );
    Ok(stats)
}

/// CLI entry point for `sitekit build`.
pub async fn run_build(config: &Config) -> Result<()> {
    let year = chrono::Local::now().year();
    let stats = build_site(config, year).await?;

    println!("build {}", config.site.root.display());
    println!("  pages built: {}", stats.pages);
    println!("  listings rendered: {}", stats.listings);
    println!("  code blocks: {}", stats.code_blocks);
    if stats.index_failed {
        println!("  article index: unavailable (listings show the error alert)");
    }
    println!("  output: {}", config.site.out_dir.display());
    println!("ok");
    Ok(())
}

fn write_page(dest: &Path, content: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, content)?;
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_site() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("site");
        fs::create_dir_all(root.join("partials")).unwrap();
        fs::create_dir_all(root.join("artigos")).unwrap();
        fs::create_dir_all(root.join("data")).unwrap();

        fs::write(root.join("partials/header.html"), "<nav>menu</nav>").unwrap();
        fs::write(
            root.join("index.html"),
            "<div data-include=\"header\"></div><span id=\"year\"></span>",
        )
        .unwrap();
        fs::write(
            root.join("artigos/index.html"),
            "<div data-include=\"header\"></div><section id=\"articles-list\" aria-busy=\"true\"></section>\
             <pre><code class=\"language-toml\">\n    [index]\n    source = \"data/articles.json\"\n</code></pre>",
        )
        .unwrap();
        fs::write(root.join("data/notes.txt"), "not a page").unwrap();
        fs::write(
            root.join("data/articles.json"),
            r#"[{"title":"Rust Guide","date":"2024-01-01","tags":["rust"],"link":"/r"}]"#,
        )
        .unwrap();

        let mut cfg = Config::minimal();
        cfg.index.source = root.join("data/articles.json").display().to_string();
        cfg.site.root = root;
        cfg.site.out_dir = tmp.path().join("dist");
        (tmp, cfg)
    }

    #[test]
    fn test_collect_pages_skips_partials_and_non_html() {
        let (_tmp, cfg) = setup_site();
        let pages = collect_pages(&cfg).unwrap();
        assert_eq!(
            pages,
            vec![PathBuf::from("artigos/index.html"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn test_collect_pages_missing_root() {
        let mut cfg = Config::minimal();
        cfg.site.root = PathBuf::from("/definitely/not/here");
        assert!(collect_pages(&cfg).is_err());
    }

    #[tokio::test]
    async fn test_build_site_writes_pages() {
        let (_tmp, cfg) = setup_site();
        let stats = build_site(&cfg, 2026).await.unwrap();
        assert_eq!(stats.pages, 2);
        assert_eq!(stats.listings, 1);
        assert!(!stats.index_failed);

        let home = fs::read_to_string(cfg.site.out_dir.join("index.html")).unwrap();
        assert!(home.contains("<nav>menu</nav>"));
        assert!(home.contains("<span id=\"year\">2026</span>"));

        let list = fs::read_to_string(cfg.site.out_dir.join("artigos/index.html")).unwrap();
        assert!(list.contains("aria-busy=\"false\""));
        assert!(list.contains("Rust Guide"));
    }

    #[tokio::test]
    async fn test_build_site_wraps_code_blocks() {
        let (_tmp, cfg) = setup_site();
        let stats = build_site(&cfg, 2026).await.unwrap();
        assert_eq!(stats.code_blocks, 1);

        let list = fs::read_to_string(cfg.site.out_dir.join("artigos/index.html")).unwrap();
        assert!(list.contains("<div class=\"code-block\">"));
        assert!(list.contains("class=\"btn-copy\""));
        assert!(list.contains("<code class=\"language-toml\">[index]\nsource = \"data/articles.json\"</code>"));
        assert!(!list.contains("    [index]"));
    }

    #[tokio::test]
    async fn test_build_site_with_missing_index_renders_alert() {
        let (_tmp, mut cfg) = setup_site();
        cfg.index.source = cfg.site.root.join("data/missing.json").display().to_string();
        let stats = build_site(&cfg, 2026).await.unwrap();
        assert!(stats.index_failed);

        let list = fs::read_to_string(cfg.site.out_dir.join("artigos/index.html")).unwrap();
        assert!(list.contains("Não foi possível carregar os artigos agora."));
    }
}
