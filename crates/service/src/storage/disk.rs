use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::{content::check_filename, errors::ServiceError};

/// Trait abstraction for where file content is persisted.
/// Implementations can be directory-backed or in-memory (tests).
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Write `content` under `filename`, replacing any existing file.
    async fn write(&self, filename: &str, content: &str) -> Result<(), ServiceError>;
    /// Read a file; `Ok(None)` when it does not exist.
    async fn read(&self, filename: &str) -> Result<Option<String>, ServiceError>;
    /// Names of the regular files currently stored, sorted.
    async fn list(&self) -> Result<Vec<String>, ServiceError>;
}

/// Directory-backed storage. The directory is created on first write.
#[derive(Clone, Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Arc<Self> {
        Arc::new(Self { root: root.into() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, ServiceError> {
        check_filename(filename)?;
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl FileStorage for DiskStorage {
    async fn write(&self, filename: &str, content: &str) -> Result<(), ServiceError> {
        let path = self.path_for(filename)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(&path, content).await?;
        debug!(path = %path.display(), bytes = content.len(), "file written");
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Option<String>, ServiceError> {
        let path = self.path_for(filename)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
