//! Core data models shared by the engine, loaders, and renderer.

use serde::{Deserialize, Serialize};

/// One entry of the article index (`articles.json`).
///
/// Optional fields keep their absence so the index can be re-serialized
/// faithfully; the accessors return the normalized defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publication date as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub link: String,
}

impl Article {
    /// Description text, or `""` when absent.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Tag labels in index order, or an empty slice when absent.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}
