//! File-backed preference storage and the `sitekit theme` command.
//!
//! Preferences live in a flat JSON object, e.g. `{"theme": "dark"}`. A
//! missing file reads as empty; every `set` rewrites the whole file.

use anyhow::{anyhow, Context, Result};
use sitekit_core::theme::{PreferenceStore, Theme, ThemeController};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;

pub struct FilePreferenceStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("preference file lock poisoned"))?;
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("preference file lock poisoned"))?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&values)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

/// Load the theme controller for the configured preference file.
pub fn theme_controller(config: &Config) -> Result<ThemeController<FilePreferenceStore>> {
    let store = FilePreferenceStore::new(&config.theme.store_path);
    ThemeController::load(store, config.theme.prefers_dark)
}

/// Theme subcommand actions.
#[derive(Debug, Clone, Copy)]
pub enum ThemeCommand {
    Show,
    Toggle,
    Set(Theme),
}

/// Run a theme command and print the resulting state.
pub fn run_theme(config: &Config, command: ThemeCommand) -> Result<()> {
    let mut controller = theme_controller(config)?;
    let theme = match command {
        ThemeCommand::Show => controller.current(),
        ThemeCommand::Toggle => controller.toggle()?,
        ThemeCommand::Set(theme) => controller.apply(theme)?,
    };
    println!("theme: {} (icon: {})", theme, theme.icon_class());
    Ok(())
}
