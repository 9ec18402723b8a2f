//! HTTP server for article search and the theme preference.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/articles?q=&tag=` | Ranked matches as JSON |
//! | `GET`  | `/articles?q=&tag=` | Ranked matches as the listing HTML |
//! | `GET`  | `/theme` | Current theme and icon class |
//! | `POST` | `/theme/toggle` | Toggle and persist the theme |
//!
//! The article index is loaded once per request; there is no cache and no
//! retry. Missing `q`/`tag` parameters are treated as empty strings.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "index_unavailable", "message": "failed to load articles.json: HTTP 404 Not Found" } }
//! ```
//!
//! Error codes: `index_unavailable` (502), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the static site can
//! call the API from another origin.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sitekit_core::search::SearchQuery;
use sitekit_core::store::ArticleStore;
use sitekit_core::theme::{PreferenceStore, Theme, ThemeController};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::index_store::{load_from, store_from_config};
use crate::render::render_listing;
use crate::search::search_loaded;
use crate::theme_store::FilePreferenceStore;

type SharedTheme = Arc<Mutex<ThemeController<Box<dyn PreferenceStore>>>>;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn ArticleStore>,
    theme: SharedTheme,
}

impl AppState {
    /// Build state with explicit backends (used by tests and embedders).
    pub fn new(
        config: Config,
        store: Arc<dyn ArticleStore>,
        preferences: Box<dyn PreferenceStore>,
    ) -> anyhow::Result<Self> {
        let controller = ThemeController::load(preferences, config.theme.prefers_dark)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            theme: Arc::new(Mutex::new(controller)),
        })
    }

    /// Build state from configuration: configured index source and the
    /// file-backed preference store.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn ArticleStore> = Arc::from(store_from_config(config)?);
        let prefs: Box<dyn PreferenceStore> =
            Box::new(FilePreferenceStore::new(&config.theme.store_path));
        Self::new(config.clone(), store, prefs)
    }
}

/// Build the router with CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/articles", get(handle_api_articles))
        .route("/articles", get(handle_articles_html))
        .route("/theme", get(handle_get_theme))
        .route("/theme/toggle", post(handle_toggle_theme))
        .layer(cors)
        .with_state(state)
}

/// Serve on an already-bound listener until the process exits.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Starts the HTTP server on `[server].bind`.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;

    info!(bind = %config.server.bind, index = %state.store.describe(), "server listening");
    println!("SiteKit server listening on http://{}", config.server.bind);

    serve(listener, state).await
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn index_unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "index_unavailable".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/articles, GET /articles ============

/// `?q=&tag=` query parameters; absent means empty.
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    tag: String,
}

async fn handle_api_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<crate::search::SearchResponse>, AppError> {
    let articles = load_from(state.store.as_ref())
        .await
        .map_err(|f| index_unavailable(f.message))?;
    let response = search_loaded(&state.config, &articles, &params.q, &params.tag);
    info!(q = %params.q, tag = %params.tag, total = response.total, shown = response.shown, "search");
    Ok(Json(response))
}

async fn handle_articles_html(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let load = load_from(state.store.as_ref()).await;
    let status = if load.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    let html = render_listing(
        &load,
        &SearchQuery::new(&params.q, &params.tag),
        &state.config.search.weights(),
    );
    (status, Html(html)).into_response()
}

// ============ GET /theme, POST /theme/toggle ============

#[derive(Serialize)]
struct ThemeResponse {
    theme: Theme,
    icon: String,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self {
            theme,
            icon: theme.icon_class().to_string(),
        }
    }
}

async fn handle_get_theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>, AppError> {
    let controller = state
        .theme
        .lock()
        .map_err(|_| internal("theme state lock poisoned"))?;
    Ok(Json(controller.current().into()))
}

async fn handle_toggle_theme(
    State(state): State<AppState>,
) -> Result<Json<ThemeResponse>, AppError> {
    let mut controller = state
        .theme
        .lock()
        .map_err(|_| internal("theme state lock poisoned"))?;
    let theme = controller.toggle().map_err(|e| {
        warn!(error = %format!("{:#}", e), "failed to persist theme");
        internal(format!("{:#}", e))
    })?;
    Ok(Json(theme.into()))
}
