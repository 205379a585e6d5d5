//! Note storage subsystem.
//!
//! # Data Flow
//! ```text
//! StorageConfig (backend, data_dir) + STORAGE env override
//!     → open_store()
//!     → memory.rs (DashMap) | filesystem.rs (one JSON file per record)
//!     → Arc<dyn NoteStore> shared with the API handlers
//! ```
//!
//! # Design Decisions
//! - Records are JSON objects keyed by a string `id`
//! - Missing ids are generated (UUID v4); numeric ids are stringified
//! - The router never touches storage; only handlers do

pub mod error;
pub mod filesystem;
pub mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::StorageError;
pub use filesystem::FileStore;
pub use memory::MemoryStore;

use crate::config::StorageConfig;

/// CRUD contract every storage backend satisfies.
pub trait NoteStore: Send + Sync {
    /// Insert or replace a record, returning it with its `id` filled in.
    fn save(&self, record: Value) -> BoxFuture<'_, Result<Value, StorageError>>;

    fn find_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Value, StorageError>>;

    /// Remove a record. `Ok(false)` when it did not exist.
    fn delete_one<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<bool, StorageError>>;

    fn fetch_all(&self) -> BoxFuture<'_, Result<Vec<Value>, StorageError>>;

    fn backend(&self) -> StorageBackend;
}

/// Available storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Filesystem,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "filesystem" => Ok(StorageBackend::Filesystem),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Open the backend selected by `config`.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn NoteStore>, StorageError> {
    let store: Arc<dyn NoteStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Filesystem => Arc::new(FileStore::open(&config.data_dir).await?),
    };
    let records = store.fetch_all().await?.len();
    tracing::info!(backend = %store.backend(), records, "Storage backend ready");
    Ok(store)
}

/// Validate `record` and settle its id.
///
/// Returns the id and the record with `id` stored as a string.
pub(crate) fn prepare_record(record: Value) -> Result<(String, Value), StorageError> {
    let Value::Object(mut map) = record else {
        return Err(StorageError::NotAnObject);
    };

    let id = match map.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    validate_id(&id)?;

    map.insert("id".to_string(), Value::String(id.clone()));
    Ok((id, Value::Object(map)))
}

/// Ids double as file names, so separators and dot segments are refused.
pub(crate) fn validate_id(id: &str) -> Result<(), StorageError> {
    let bad = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if bad {
        Err(StorageError::invalid_id(id))
    } else {
        Ok(())
    }
}
