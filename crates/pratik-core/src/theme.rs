//! Persisted light/dark theme preference.

use std::sync::Arc;

use crate::ports::{ColorSchemeProbe, PreferenceError, PreferenceStore};

/// Preference key holding the theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The theme flag, read once at startup and written on every change.
pub struct ThemePreference {
    store: Arc<dyn PreferenceStore>,
    current: Theme,
}

impl ThemePreference {
    /// Load the stored theme; when nothing is stored, follow the system.
    ///
    /// Any stored value other than `dark` reads as light.
    pub async fn load(store: Arc<dyn PreferenceStore>, probe: &dyn ColorSchemeProbe) -> Self {
        let current = match store.get(THEME_KEY).await {
            Some(value) if value == Theme::Dark.as_str() => Theme::Dark,
            Some(_) => Theme::Light,
            None if probe.prefers_dark() => Theme::Dark,
            None => Theme::Light,
        };
        tracing::debug!(theme = current.as_str(), "Theme loaded");
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current == Theme::Dark
    }

    pub async fn set(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.current = theme;
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn toggle(&mut self) -> Result<Theme, PreferenceError> {
        let next = self.current.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
