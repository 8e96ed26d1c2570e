use crate::core::{KeyValueStore, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const STORAGE_FILE: &str = "local-storage.json";

/// Local-storage emulation on disk.
///
/// All keys live in one JSON object (`local-storage.json`) under the base
/// directory, string keys to string values, like the browser's storage.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.base_path.join(STORAGE_FILE)
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let path = self.file_path();
        match tokio::fs::read(&path).await {
            Ok(data) => match serde_json::from_slice(&data) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    // 檔案損毀時視為空的儲存區，下一次寫入會覆蓋
                    tracing::warn!(
                        "⚠️ Ignoring corrupt storage file {}: {}",
                        path.display(),
                        e
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());

        let path = self.file_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫入暫存檔再改名，避免寫到一半的檔案
        let tmp_path = self.base_path.join(format!("{}.tmp", STORAGE_FILE));
        let data = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Stored key '{}' in {}", key, path.display());
        Ok(())
    }
}

/// In-process store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());

        assert_eq!(store.get("@RocketShoes:cart").await.unwrap(), None);
        assert!(!store.file_path().exists());
    }

    #[tokio::test]
    async fn test_file_store_set_then_get_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("dir");

        let store = FileKeyValueStore::new(&nested);
        store.set("@RocketShoes:cart", "[]").await.unwrap();
        store.set("other", "value").await.unwrap();
        store.set("@RocketShoes:cart", r#"[{"id":1,"amount":2}]"#).await.unwrap();

        let reopened = FileKeyValueStore::new(&nested);
        assert_eq!(
            reopened.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some(r#"[{"id":1,"amount":2}]"#)
        );
        assert_eq!(reopened.get("other").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_reads_empty_and_is_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());
        tokio::fs::write(store.file_path(), b"{oops").await.unwrap();

        assert_eq!(store.get("@RocketShoes:cart").await.unwrap(), None);

        store.set("@RocketShoes:cart", "[]").await.unwrap();
        assert_eq!(store.get("@RocketShoes:cart").await.unwrap().as_deref(), Some("[]"));
        let raw = tokio::fs::read(store.file_path()).await.unwrap();
        assert!(serde_json::from_slice::<BTreeMap<String, String>>(&raw).is_ok());
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_entries() {
        let store = MemoryKeyValueStore::with_entry("k", "v1").await;
        let clone = store.clone();
        clone.set("k", "v2").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }
}
