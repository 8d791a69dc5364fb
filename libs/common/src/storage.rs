//! Key-value persistence for client state
//!
//! This module provides the storage port used to keep small pieces of client
//! state (such as the signed-in session) between runs, together with a
//! file-backed implementation and an in-memory one.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};

/// String key-value persistence
///
/// Implementations decide the medium (a file, an OS keychain, a remote
/// cache). Deleting a key that is not present must succeed.
pub trait KeyValueStore {
    /// Get a value by key
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Set a key-value pair, replacing any previous value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Delete a key
    fn delete(&self, key: &str) -> impl Future<Output = StorageResult<()>> + Send;
}

/// Store keeping every entry in a single JSON object on disk
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    /// Create a store backed by the file at `path`
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("File store initialized at: {}", path.display());
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> StorageResult<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Document to start a write from, and whether it replaces a corrupt one
    ///
    /// An undecodable document is discarded rather than blocking every write.
    async fn read_for_write(&self) -> StorageResult<(BTreeMap<String, String>, bool)> {
        match self.read_document().await {
            Ok(document) => Ok((document, false)),
            Err(StorageError::Serialization(e)) => {
                warn!(
                    "Discarding undecodable document at {}: {}",
                    self.path.display(),
                    e
                );
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn write_document(&self, document: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let body = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let (mut document, _) = self.read_for_write().await?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document).await?;
        debug!("Stored key `{}` in {}", key, self.path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let (mut document, replaced) = self.read_for_write().await?;
        if document.remove(key).is_none() && !replaced {
            return Ok(());
        }
        self.write_document(&document).await?;
        debug!("Deleted key `{}` from {}", key, self.path.display());
        Ok(())
    }
}

/// In-process store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_file_store_set_get_delete() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("nested").join("state.json"));

        store.set("user", "alice").await?;
        assert_eq!(store.get("user").await?, Some("alice".to_string()));

        store.set("user", "bob").await?;
        assert_eq!(store.get("user").await?, Some("bob".to_string()));

        store.delete("user").await?;
        assert_eq!(store.get("user").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_missing_file_reads_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("token").await?, None);
        store.delete("token").await?;
        assert!(!store.path().exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");

        FileStore::new(&path).set("token", "abc").await?;
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("token").await?, Some("abc".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_corrupt_document_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json")?;

        let store = FileStore::new(&path);
        assert!(store.get("user").await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_writes_replace_corrupt_document() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        std::fs::write(&path, "garbage")?;

        let store = FileStore::new(&path);
        store.delete("user").await?;
        assert_eq!(store.get("user").await?, None);
        assert_ne!(std::fs::read_to_string(&path)?, "garbage");

        std::fs::write(&path, "garbage")?;
        store.set("token", "abc").await?;
        assert_eq!(store.get("token").await?, Some("abc".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_is_shared_between_clones() -> Result<()> {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("user", "alice").await?;
        assert_eq!(other.get("user").await?, Some("alice".to_string()));
        assert_eq!(other.len().await, 1);

        other.delete("user").await?;
        other.delete("user").await?;
        assert!(store.is_empty().await);

        Ok(())
    }
}
