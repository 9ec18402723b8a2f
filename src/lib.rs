//! # SiteKit
//!
//! Article index search, rendering, and theme tooling for static content
//! sites.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌────────────┐
//! │ ArticleStore │──▶│  Search engine   │──▶│  Renderer  │
//! │ file / HTTP  │   │ (sitekit-core)   │   │   HTML     │
//! └──────────────┘   └──────────────────┘   └─────┬──────┘
//!                                                 │
//!                      ┌──────────────────────────┤
//!                      ▼                          ▼
//!                 ┌──────────┐              ┌──────────┐
//!                 │   CLI    │              │   HTTP   │
//!                 │(sitekit) │              │  (axum)  │
//!                 └──────────┘              └──────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. An [`ArticleStore`](sitekit_core::store::ArticleStore) loads
//!    `articles.json` ([`index_store`]); failures become an explicit
//!    [`index_store::LoadFailure`].
//! 2. The engine in `sitekit_core::search` filters by tag, scores by query
//!    tokens, and ranks.
//! 3. [`render`] turns the outcome (or the failure) into escaped HTML.
//! 4. Results reach users through the CLI, the static [`site_build`], and
//!    the HTTP [`server`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`index_store`] | File and HTTP article index loaders |
//! | [`search`] | Search entry points for CLI and HTTP |
//! | [`render`] | Article cards, listing, status line, alerts, code blocks |
//! | [`page`] | Page transforms: partials, year, listing, code blocks |
//! | [`site_build`] | `sitekit build` page rendering |
//! | [`theme_store`] | File-backed preference store and theme command |
//! | [`server`] | HTTP API (Axum) with CORS |

pub mod config;
pub mod index_store;
pub mod page;
pub mod render;
pub mod search;
pub mod server;
pub mod site_build;
pub mod theme_store;

pub use sitekit_core::models::Article;
pub use sitekit_core::{codeblock, normalize, store, theme};
