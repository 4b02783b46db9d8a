use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::sync::RwLock;

use crate::errors::ServiceError;

/// Staged state of a single file.
///
/// `dirty` is true iff `content` may differ from what was last written to disk.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FileRecord {
    pub content: String,
    pub dirty: bool,
}

/// In-memory map of `filename -> FileRecord`.
///
/// Shared through an `Arc`; concurrent writers to the same filename are
/// last-write-wins.
#[derive(Default)]
pub struct RecordStore {
    inner: RwLock<HashMap<String, FileRecord>>,
}

impl RecordStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert or overwrite a record.
    pub async fn put(&self, filename: impl Into<String>, content: impl Into<String>, dirty: bool) {
        let mut map = self.inner.write().await;
        map.insert(filename.into(), FileRecord { content: content.into(), dirty });
    }

    pub async fn get(&self, filename: &str) -> Option<FileRecord> {
        let map = self.inner.read().await;
        map.get(filename).cloned()
    }

    /// Replace the content of an existing record and mark it dirty.
    pub async fn update(&self, filename: &str, content: impl Into<String>) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let record = map.get_mut(filename).ok_or_else(|| ServiceError::not_found(filename))?;
        record.content = content.into();
        record.dirty = true;
        Ok(())
    }

    /// Clear the dirty flag after `persisted` reached disk.
    ///
    /// Returns false (and leaves the record dirty) when the content changed
    /// while the write was in flight, or the record is gone.
    pub async fn mark_clean(&self, filename: &str, persisted: &str) -> bool {
        let mut map = self.inner.write().await;
        match map.get_mut(filename) {
            Some(record) if record.content == persisted => {
                record.dirty = false;
                true
            }
            _ => false,
        }
    }

    /// All records, sorted by filename.
    pub async fn list(&self) -> Vec<(String, FileRecord)> {
        let map = self.inner.read().await;
        let mut items: Vec<_> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
