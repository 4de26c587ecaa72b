//! Local preference persistence.

use async_trait::async_trait;

/// Key/value persistence for small user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Reports the system light/dark preference.
pub trait ColorSchemeProbe: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference storage failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
