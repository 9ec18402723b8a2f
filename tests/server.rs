//! HTTP server tests.
//!
//! Each test serves the router on an ephemeral port with an in-memory
//! article store and preference store, then talks to it over `reqwest`.

use serde_json::Value;
use sitekit::config::Config;
use sitekit::server::{serve, AppState};
use sitekit::store::memory::InMemoryArticleStore;
use sitekit::store::ArticleStore;
use sitekit::theme::{MemoryPreferenceStore, PreferenceStore};
use sitekit::Article;
use std::sync::Arc;

fn article(title: &str, date: &str, tags: &[&str]) -> Article {
    Article {
        title: title.to_string(),
        description: None,
        date: date.to_string(),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        link: format!("/{}", title.to_lowercase().replace(' ', "-")),
    }
}

async fn start(store: Arc<dyn ArticleStore>) -> String {
    let prefs: Box<dyn PreferenceStore> = Box::new(MemoryPreferenceStore::new());
    let state = AppState::new(Config::minimal(), store, prefs).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    format!("http://{}", addr)
}

fn scenario_store() -> Arc<dyn ArticleStore> {
    Arc::new(InMemoryArticleStore::new(vec![
        article("Rust Guide", "2024-01-01", &["rust"]),
        article("Go Basics", "2024-02-01", &["go"]),
    ]))
}

/// Store whose load always fails.
struct BrokenStore;

#[async_trait::async_trait]
impl ArticleStore for BrokenStore {
    fn describe(&self) -> String {
        "broken".to_string()
    }

    async fn load_articles(&self) -> anyhow::Result<Vec<Article>> {
        anyhow::bail!("failed to load articles.json: HTTP 500 Internal Server Error")
    }
}

#[tokio::test]
async fn test_health() {
    let base = start(scenario_store()).await;
    let resp: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["status"], "ok");
}

#[tokio::test]
async fn test_api_query() {
    let base = start(scenario_store()).await;
    let resp: Value = reqwest::get(format!("{}/api/articles?q=guide", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["total"], 2);
    assert_eq!(resp["shown"], 1);
    assert_eq!(resp["articles"][0]["title"], "Rust Guide");
}

#[tokio::test]
async fn test_api_tag_without_query() {
    let base = start(scenario_store()).await;
    let resp: Value = reqwest::get(format!("{}/api/articles?tag=go", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["total"], 1);
    assert_eq!(resp["shown"], 1);
    assert_eq!(resp["articles"][0]["title"], "Go Basics");
}

#[tokio::test]
async fn test_api_no_params_lists_all_newest_first() {
    let base = start(scenario_store()).await;
    let resp: Value = reqwest::get(format!("{}/api/articles", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["shown"], 2);
    assert_eq!(resp["articles"][0]["title"], "Go Basics");
    assert_eq!(resp["articles"][1]["title"], "Rust Guide");
}

#[tokio::test]
async fn test_api_index_failure_is_502() {
    let base = start(Arc::new(BrokenStore)).await;
    let resp = reqwest::get(format!("{}/api/articles?q=rust", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "index_unavailable");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("HTTP 500"));
}

#[tokio::test]
async fn test_articles_html() {
    let base = start(scenario_store()).await;
    let resp = reqwest::get(format!("{}/articles?q=go&tag=go", base))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Go Basics"));
    assert!(!html.contains("Rust Guide"));
    assert!(html.contains("name=\"tag\" value=\"go\""));
}

#[tokio::test]
async fn test_articles_html_failure_renders_alert() {
    let base = start(Arc::new(BrokenStore)).await;
    let resp = reqwest::get(format!("{}/articles", base)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 502);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Não foi possível carregar os artigos agora."));
}

#[tokio::test]
async fn test_theme_toggle() {
    let base = start(scenario_store()).await;
    let client = reqwest::Client::new();

    let resp: Value = client
        .get(format!("{}/theme", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["theme"], "light");
    assert_eq!(resp["icon"], "bi-moon");

    let resp: Value = client
        .post(format!("{}/theme/toggle", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["theme"], "dark");
    assert_eq!(resp["icon"], "bi-sun");

    let resp: Value = client
        .get(format!("{}/theme", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["theme"], "dark");
}
