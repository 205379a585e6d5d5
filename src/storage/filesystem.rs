//! Filesystem-backed note storage.
//!
//! Each record lives in `<data_dir>/<id>.json`. Writes go to a temporary
//! file first and are renamed into place, so a reader never sees a partial
//! record. Every write gets its own temporary file, so concurrent saves of
//! one id never share it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::storage::{prepare_record, validate_id, NoteStore, StorageBackend, StorageError};

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store directory.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = ?dir, "File store opened");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }
}

impl NoteStore for FileStore {
    fn save(&self, record: Value) -> BoxFuture<'_, Result<Value, StorageError>> {
        async move {
            let (id, record) = prepare_record(record)?;
            let path = self.record_path(&id)?;
            let tmp = self.dir.join(format!("{}.{}.tmp", id, uuid::Uuid::new_v4()));

            tokio::fs::write(&tmp, serde_json::to_vec(&record)?).await?;
            if let Err(e) = tokio::fs::rename(&tmp, &path).await {
                if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                    tracing::warn!(path = ?tmp, error = %cleanup, "Failed to remove temporary record");
                }
                return Err(e.into());
            }
            Ok(record)
        }
        .boxed()
    }

    fn find_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, StorageError>> {
        async move {
            let path = self.record_path(id)?;
            match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
                Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(id)),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn delete_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool, StorageError>> {
        async move {
            let path = self.record_path(id)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Value>, StorageError>> {
        async move {
            let mut records = Vec::new();
            let mut entries = tokio::fs::read_dir(&self.dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                    continue;
                }
                let bytes = tokio::fs::read(&path).await?;
                match serde_json::from_slice(&bytes) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!(path = ?path, error = %e, "Skipping unreadable record"),
                }
            }
            Ok(records)
        }
        .boxed()
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Filesystem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("route-dispatch-{}", uuid::Uuid::new_v4()));
        FileStore::open(&dir).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_find_delete() {
        let store = temp_store().await;

        let saved = store.save(json!({"id": 3212, "title": "javaScript"})).await.unwrap();
        assert_eq!(saved["id"], "3212");
        assert!(store.dir().join("3212.json").exists());

        let found = store.find_one("3212").await.unwrap();
        assert_eq!(found["title"], "javaScript");

        assert!(store.delete_one("3212").await.unwrap());
        assert!(!store.delete_one("3212").await.unwrap());
        assert!(matches!(
            store.find_one("3212").await,
            Err(StorageError::NotFound { .. })
        ));

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_saves_of_same_id() {
        let store = temp_store().await;

        let saves = (0..16).map(|n| store.save(json!({"id": "shared", "n": n})));
        let results = futures_util::future::join_all(saves).await;
        assert!(results.iter().all(Result::is_ok));

        let found = store.find_one("shared").await.unwrap();
        assert_eq!(found["id"], "shared");

        let mut entries = tokio::fs::read_dir(store.dir()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["shared.json"]);

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_all_skips_foreign_files() {
        let store = temp_store().await;
        store.save(json!({"id": "a"})).await.unwrap();
        store.save(json!({"id": "b"})).await.unwrap();
        tokio::fs::write(store.dir().join("notes.txt"), b"ignored").await.unwrap();

        let mut ids: Vec<String> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let store = temp_store().await;
        assert!(matches!(
            store.find_one("../secret").await,
            Err(StorageError::InvalidId { .. })
        ));
        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }
}
