//! In-memory note storage.

use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::storage::{prepare_record, NoteStore, StorageBackend, StorageError};

/// Process-lifetime store backed by a concurrent map.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Seed a record directly, bypassing id generation.
    pub fn insert(&self, id: impl Into<String>, record: Value) {
        self.records.insert(id.into(), record);
    }
}

impl NoteStore for MemoryStore {
    fn save(&self, record: Value) -> BoxFuture<'_, Result<Value, StorageError>> {
        async move {
            let (id, record) = prepare_record(record)?;
            self.records.insert(id, record.clone());
            Ok(record)
        }
        .boxed()
    }

    fn find_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, StorageError>> {
        async move {
            self.records
                .get(id)
                .map(|r| r.value().clone())
                .ok_or_else(|| StorageError::not_found(id))
        }
        .boxed()
    }

    fn delete_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool, StorageError>> {
        async move { Ok(self.records.remove(id).is_some()) }.boxed()
    }

    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Value>, StorageError>> {
        async move { Ok(self.records.iter().map(|r| r.value().clone()).collect()) }.boxed()
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryStore::new();
        let saved = store.save(json!({"id": "123", "note-category": "reminders"})).await.unwrap();
        assert_eq!(saved["id"], "123");

        let found = store.find_one("123").await.unwrap();
        assert_eq!(found, json!({"id": "123", "note-category": "reminders"}));
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = MemoryStore::new();
        let err = store.find_one("2222").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.insert("3212", json!({"id": "3212"}));
        assert!(store.delete_one("3212").await.unwrap());
        assert!(!store.delete_one("3212").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.save(json!({"id": "a"})).await.unwrap();
        store.save(json!({"id": "b"})).await.unwrap();
        assert_eq!(other.fetch_all().await.unwrap().len(), 2);
    }
}
