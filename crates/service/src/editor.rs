//! Staged editing: validated content lives in the [`RecordStore`] until an
//! explicit save writes it through [`FileStorage`].

use std::sync::Arc;

use common::fetch::{filename_from_url, Fetcher};
use serde::Serialize;
use tracing::info;

use crate::{
    content::{self, ContentKind},
    errors::ServiceError,
    storage::{disk::FileStorage, record_store::RecordStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    NothingToSave,
}

impl SaveOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Saved => "File saved.",
            Self::NothingToSave => "No changes to save.",
        }
    }
}

/// Listing entry for a staged file.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FileSummary {
    pub filename: String,
    pub kind: ContentKind,
    pub dirty: bool,
}

pub struct EditorService {
    store: Arc<RecordStore>,
    storage: Arc<dyn FileStorage>,
    fetcher: Fetcher,
}

impl EditorService {
    pub fn new(store: Arc<RecordStore>, storage: Arc<dyn FileStorage>, fetcher: Fetcher) -> Self {
        Self { store, storage, fetcher }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Stage an uploaded file as clean.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        content::check_filename(filename)?;
        let kind = ContentKind::from_filename(filename)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ServiceError::MalformedContent(format!("file is not valid UTF-8: {e}")))?;
        kind.validate(text)?;

        self.store.put(filename, text, false).await;
        info!(event = "upload", %filename, bytes = bytes.len(), "file staged");
        Ok(filename.to_string())
    }

    /// Download a file and stage it as clean under the URL's last path segment.
    pub async fn fetch(&self, url: &str) -> Result<String, ServiceError> {
        let filename = filename_from_url(url).ok_or_else(|| ServiceError::InvalidFilename(url.to_string()))?;
        content::check_filename(&filename)?;
        let kind = ContentKind::from_filename(&filename)?;

        let text = self.fetcher.fetch_text(url).await?;
        kind.validate(&text)?;

        self.store.put(filename.as_str(), text, false).await;
        info!(event = "fetch", %filename, %url, "file staged");
        Ok(filename)
    }

    /// Stage a brand new file. It starts dirty since nothing is on disk yet.
    pub async fn create(&self, filename: &str, content: &str) -> Result<(), ServiceError> {
        content::validate(filename, content)?;
        self.store.put(filename, content, true).await;
        info!(event = "create", %filename, "file created");
        Ok(())
    }

    pub async fn read(&self, filename: &str) -> Result<String, ServiceError> {
        self.store
            .get(filename)
            .await
            .map(|rec| rec.content)
            .ok_or_else(|| ServiceError::not_found(filename))
    }

    /// Replace staged content; the record becomes dirty.
    pub async fn update(&self, filename: &str, content: &str) -> Result<(), ServiceError> {
        if self.store.get(filename).await.is_none() {
            return Err(ServiceError::not_found(filename));
        }
        ContentKind::from_filename(filename)?.validate(content)?;
        self.store.update(filename, content).await?;
        info!(event = "update", %filename, "changes staged");
        Ok(())
    }

    /// Persist a dirty record. Clean records are left alone.
    pub async fn save(&self, filename: &str) -> Result<SaveOutcome, ServiceError> {
        let record = self
            .store
            .get(filename)
            .await
            .ok_or_else(|| ServiceError::not_found(filename))?;
        if !record.dirty {
            info!(event = "save_skipped", %filename, "no changes to save");
            return Ok(SaveOutcome::NothingToSave);
        }

        self.storage.write(filename, &record.content).await?;
        if !self.store.mark_clean(filename, &record.content).await {
            // a newer edit landed during the write; it stays dirty
            info!(event = "save_superseded", %filename, "content changed while saving");
        }
        info!(event = "save", %filename, bytes = record.content.len(), "file saved");
        Ok(SaveOutcome::Saved)
    }

    pub async fn list(&self) -> Vec<FileSummary> {
        self.store
            .list()
            .await
            .into_iter()
            .filter_map(|(filename, rec)| {
                let kind = ContentKind::from_filename(&filename).ok()?;
                Some(FileSummary { filename, kind, dirty: rec.dirty })
            })
            .collect()
    }
}
