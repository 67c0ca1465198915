//! # Key-Value Storage
//!
//! The durable backing store for the cart. One string key maps to one string
//! value; reads and writes are always whole-value.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │           KeyValueStore (trait)              │
//! │  ├── get(key)                                │
//! │  ├── set(key, value)                         │
//! │  └── remove(key)                             │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!           ┌───────────┴───────────┐
//!   ┌───────┴───────┐       ┌───────┴───────┐
//!   │  MemoryStore  │       │   FileStore   │
//!   └───────────────┘       └───────────────┘
//! ```

use crate::error::{ShopError, ShopResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Async string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` if the key has never been written.
    async fn get(&self, key: &str) -> ShopResult<Option<String>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> ShopResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> ShopResult<()>;

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared storage backend (dynamic dispatch)
pub type SharedStore = Arc<dyn KeyValueStore>;

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> ShopResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ShopResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Store backed by a single JSON file holding a `key -> value` map.
///
/// Writes go to `<path>.tmp` and are renamed over the target, so a crash
/// mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write of the whole file.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_raw(&self) -> ShopResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShopError::Storage(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn parse_map(&self, bytes: &[u8]) -> ShopResult<HashMap<String, String>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(HashMap::new());
        }
        serde_json::from_slice(bytes).map_err(|e| {
            ShopError::Storage(format!("{} is not a valid store file: {}", self.path.display(), e))
        })
    }

    async fn read_map(&self) -> ShopResult<HashMap<String, String>> {
        match self.read_raw().await? {
            Some(bytes) => self.parse_map(&bytes),
            None => Ok(HashMap::new()),
        }
    }

    /// Map to rewrite: a corrupt file starts over empty, an unreadable one is an error.
    async fn read_map_for_write(&self) -> ShopResult<HashMap<String, String>> {
        let Some(bytes) = self.read_raw().await? else {
            return Ok(HashMap::new());
        };
        match self.parse_map(&bytes) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(error = %e, "discarding corrupt store file");
                Ok(HashMap::new())
            }
        }
    }

    async fn write_map(&self, map: &HashMap<String, String>) -> ShopResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ShopError::Storage(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let body = serde_json::to_string_pretty(map)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await.map_err(|e| {
            ShopError::Storage(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ShopError::Storage(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), keys = map.len(), "store file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> ShopResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> ShopResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await
    }

    async fn remove(&self, key: &str) -> ShopResult<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map_for_write().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("simpleshop-{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let path = scratch_path();

        let store = FileStore::new(&path);
        assert_eq!(store.get("cart").await.unwrap(), None);
        store.set("cart", "[]").await.unwrap();
        store.set("other", "x").await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("cart").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").await.unwrap().as_deref(), Some("x"));

        reopened.remove("other").await.unwrap();
        assert_eq!(store.get("other").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file() {
        let path = scratch_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("cart").await,
            Err(ShopError::Storage(_))
        ));

        // writes recover the file
        store.set("cart", "[]").await.unwrap();
        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_file_store_unreadable_file_is_not_overwritten() {
        let path = scratch_path();
        // A directory where the file should be: reads fail with an I/O error.
        std::fs::create_dir_all(&path).unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("cart").await, Err(ShopError::Storage(_))));
        assert!(matches!(store.set("cart", "[]").await, Err(ShopError::Storage(_))));
        assert!(matches!(store.remove("cart").await, Err(ShopError::Storage(_))));

        // nothing was staged for the rename either
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        assert!(path.is_dir());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
