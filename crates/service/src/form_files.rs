//! Direct-to-disk editing for the form editor: no staging, every submit writes.

use std::sync::Arc;

use tracing::info;

use crate::{
    content::{check_filename, ContentKind},
    errors::ServiceError,
    storage::disk::FileStorage,
};

/// Used when a submitted form carries no filename at all.
pub const DEFAULT_FILENAME: &str = "untitled.txt";

/// True when the last suffix (case-insensitive) is a supported type.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ContentKind::from_extension(&ext.to_ascii_lowercase()).is_some())
        .unwrap_or(false)
}

pub struct FormFiles {
    storage: Arc<dyn FileStorage>,
}

impl FormFiles {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    /// Content of an editable file; `None` if missing or not editable.
    pub async fn read(&self, filename: &str) -> Result<Option<String>, ServiceError> {
        if !allowed_file(filename) || check_filename(filename).is_err() {
            return Ok(None);
        }
        self.storage.read(filename).await
    }

    /// Write immediately, replacing any existing file.
    pub async fn write(&self, filename: &str, content: &str) -> Result<(), ServiceError> {
        if !allowed_file(filename) {
            return Err(ServiceError::UnsupportedType(filename.to_string()));
        }
        self.storage.write(filename, content).await?;
        info!(event = "form_save", %filename, bytes = content.len(), "file written");
        Ok(())
    }

    /// Editable files currently on disk.
    pub async fn list(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.storage.list().await?.into_iter().filter(|n| allowed_file(n)).collect())
    }
}
