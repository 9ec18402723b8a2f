//! Site-wide light/dark theme preference.
//!
//! The theme is process-wide configuration with an explicit lifecycle:
//! [`ThemeController::load`] reads it once at startup and every
//! [`apply`](ThemeController::apply) or [`toggle`](ThemeController::toggle)
//! saves it back. Storage is injected through [`PreferenceStore`].
//!
//! Initial theme resolution:
//!
//! 1. A valid saved value under [`THEME_KEY`].
//! 2. [`Theme::Dark`] when the system prefers a dark color scheme.
//! 3. [`Theme::Light`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

/// Preference key the theme is stored under.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Bootstrap icon shown on the toggle button: the sun offers a way back
    /// to light while dark is active, the moon the opposite.
    pub fn icon_class(self) -> &'static str {
        match self {
            Theme::Light => "bi-moon",
            Theme::Dark => "bi-sun",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => bail!("unknown theme: '{}'. Must be light or dark.", other),
        }
    }
}

/// Key/value preference storage (the browser's `localStorage` analogue).
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Volatile [`PreferenceStore`] for tests and embedding.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Owns the current theme and persists every change.
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the initial theme and persist it, mirroring the page-load
    /// behaviour where the resolved theme is applied (and saved) at once.
    ///
    /// An unrecognised saved value is ignored in favour of the system
    /// preference.
    pub fn load(store: S, prefers_dark: bool) -> Result<Self> {
        let saved = store.get(THEME_KEY)?.and_then(|v| v.parse::<Theme>().ok());
        let initial = saved.unwrap_or(if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        let mut controller = Self {
            store,
            current: initial,
        };
        controller.apply(initial)?;
        Ok(controller)
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Set and persist `theme`.
    pub fn apply(&mut self, theme: Theme) -> Result<Theme> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        Ok(theme)
    }

    /// Flip between light and dark; returns the new theme.
    pub fn toggle(&mut self) -> Result<Theme> {
        self.apply(self.current.toggle())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_icon_classes() {
        assert_eq!(Theme::Dark.icon_class(), "bi-sun");
        assert_eq!(Theme::Light.icon_class(), "bi-moon");
    }

    #[test]
    fn test_load_defaults_to_light() {
        let c = ThemeController::load(MemoryPreferenceStore::new(), false).unwrap();
        assert_eq!(c.current(), Theme::Light);
    }

    #[test]
    fn test_load_uses_system_preference() {
        let c = ThemeController::load(MemoryPreferenceStore::new(), true).unwrap();
        assert_eq!(c.current(), Theme::Dark);
    }

    #[test]
    fn test_saved_value_wins_over_system() {
        let store = MemoryPreferenceStore::new();
        store.set(THEME_KEY, "light").unwrap();
        let c = ThemeController::load(store, true).unwrap();
        assert_eq!(c.current(), Theme::Light);
    }

    #[test]
    fn test_invalid_saved_value_ignored() {
        let store = MemoryPreferenceStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        let c = ThemeController::load(store, true).unwrap();
        assert_eq!(c.current(), Theme::Dark);
        assert_eq!(c.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_load_persists_resolved_theme() {
        let c = ThemeController::load(MemoryPreferenceStore::new(), false).unwrap();
        assert_eq!(c.store().get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_boxed_store() {
        let store: Box<dyn PreferenceStore> = Box::new(MemoryPreferenceStore::new());
        let mut c = ThemeController::load(store, false).unwrap();
        c.apply(Theme::Dark).unwrap();
        assert_eq!(c.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_saves_each_change() {
        let mut c = ThemeController::load(MemoryPreferenceStore::new(), false).unwrap();
        assert_eq!(c.toggle().unwrap(), Theme::Dark);
        assert_eq!(c.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(c.toggle().unwrap(), Theme::Light);
        assert_eq!(c.store().get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }
}
