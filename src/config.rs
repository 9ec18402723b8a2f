//! TOML configuration.
//!
//! ```toml
//! [index]
//! source = "./site/data/articles.json"   # or https://example.com/data/articles.json
//! timeout_secs = 10
//!
//! [site]
//! root = "./site"
//! partials_dir = "partials"
//! include_globs = ["**/*.html"]
//! out_dir = "./dist"
//!
//! [theme]
//! store_path = "./data/preferences.json"
//! prefers_dark = false
//!
//! [search]
//! title_weight = 3
//! tag_weight = 2
//! description_weight = 1
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use sitekit_core::search::ScoreWeights;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub index: IndexConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    /// Path to `articles.json`, or an `http(s)://` URL serving it.
    pub source: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_root")]
    pub root: PathBuf,
    /// Directory holding `<name>.html` partials, relative to `root`.
    #[serde(default = "default_partials_dir")]
    pub partials_dir: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            partials_dir: default_partials_dir(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            out_dir: default_out_dir(),
        }
    }
}

impl SiteConfig {
    pub fn partials_path(&self) -> PathBuf {
        self.root.join(&self.partials_dir)
    }
}

fn default_site_root() -> PathBuf {
    PathBuf::from("./site")
}
fn default_partials_dir() -> PathBuf {
    PathBuf::from("partials")
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.html".to_string()]
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("./dist")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Stands in for the browser's `prefers-color-scheme: dark` query.
    #[serde(default)]
    pub prefers_dark: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            prefers_dark: false,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/preferences.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_title_weight")]
    pub title_weight: u32,
    #[serde(default = "default_tag_weight")]
    pub tag_weight: u32,
    #[serde(default = "default_description_weight")]
    pub description_weight: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            title_weight: default_title_weight(),
            tag_weight: default_tag_weight(),
            description_weight: default_description_weight(),
        }
    }
}

impl SearchConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            title: self.title_weight,
            tags: self.tag_weight,
            description: self.description_weight,
        }
    }
}

fn default_title_weight() -> u32 {
    3
}
fn default_tag_weight() -> u32 {
    2
}
fn default_description_weight() -> u32 {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl Config {
    /// Defaults for commands that can run without a config file.
    pub fn minimal() -> Self {
        Self {
            index: IndexConfig {
                source: "./site/data/articles.json".to_string(),
                timeout_secs: default_timeout_secs(),
            },
            site: SiteConfig::default(),
            theme: ThemeConfig::default(),
            search: SearchConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

fn validate(config: &Config) -> Result<()> {
    if config.index.source.trim().is_empty() {
        anyhow::bail!("index.source must not be empty");
    }

    if config.index.timeout_secs == 0 {
        anyhow::bail!("index.timeout_secs must be > 0");
    }

    // A zero weight would let a matching token score nothing
    let w = config.search.weights();
    if w.title == 0 || w.tags == 0 || w.description == 0 {
        anyhow::bail!("search weights must all be >= 1");
    }

    config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("server.bind is not a socket address: {}", config.server.bind))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_uses_defaults() {
        let cfg = parse_config("[index]\nsource = \"articles.json\"\n").unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.index.timeout_secs, 10);
        assert_eq!(cfg.site.include_globs, vec!["**/*.html"]);
        assert_eq!(cfg.search.weights(), ScoreWeights::default());
        assert_eq!(cfg.server.bind, "127.0.0.1:7341");
        assert!(!cfg.theme.prefers_dark);
    }

    #[test]
    fn test_missing_index_section_fails() {
        assert!(parse_config("[server]\nbind = \"127.0.0.1:1\"\n").is_err());
    }

    #[test]
    fn test_rejects_empty_source() {
        let cfg = parse_config("[index]\nsource = \"  \"\n").unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_rejects_zero_weight() {
        let cfg = parse_config(
            "[index]\nsource = \"a.json\"\n[search]\ndescription_weight = 0\n",
        )
        .unwrap();
        let err = validate(&cfg).unwrap_err().to_string();
        assert!(err.contains("weights"));
    }

    #[test]
    fn test_rejects_bad_bind() {
        let cfg = parse_config("[index]\nsource = \"a.json\"\n[server]\nbind = \"nowhere\"\n")
            .unwrap();
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_partials_path_is_under_root() {
        let cfg = parse_config(
            "[index]\nsource = \"a.json\"\n[site]\nroot = \"web\"\npartials_dir = \"inc\"\n",
        )
        .unwrap();
        assert_eq!(cfg.site.partials_path(), PathBuf::from("web").join("inc"));
    }

    #[test]
    fn test_minimal_is_valid() {
        validate(&Config::minimal()).unwrap();
    }
}
