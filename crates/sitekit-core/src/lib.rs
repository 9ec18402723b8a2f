//! # SiteKit Core
//!
//! Shared, WASM-safe logic for SiteKit: the article model, text
//! normalization, the search/filter engine, store and preference traits,
//! theme state, and code-block dedent.
//!
//! This crate contains no tokio, HTTP, filesystem I/O, or other
//! native-only dependencies.

pub mod codeblock;
pub mod models;
pub mod normalize;
pub mod search;
pub mod store;
pub mod theme;
