//! Preferences persisted as a flat JSON object on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use pratik_core::ports::{PreferenceError, PreferenceStore};

/// Reads the file once on open and rewrites it on every `set`.
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`. A missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| PreferenceError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PreferenceError::Io(e.to_string())),
        };
        tracing::debug!(path = %path.display(), entries = values.len(), "Preferences loaded");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());

        let raw = serde_json::to_string_pretty(&*values)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PreferenceError::Io(e.to_string()))?;
        }
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pratik-prefs-{}-{name}.json", std::process::id()))
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        let store = JsonFilePreferenceStore::open(&path).await.unwrap();
        assert_eq!(store.get("theme").await, None);
        store.set("theme", "dark").await.unwrap();

        let reopened = JsonFilePreferenceStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("theme").await.as_deref(), Some("dark"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, "not json").await.unwrap();

        assert!(matches!(
            JsonFilePreferenceStore::open(&path).await,
            Err(PreferenceError::Serialization(_))
        ));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
