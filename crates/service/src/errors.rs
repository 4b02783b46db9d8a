use common::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("invalid filename: {0}")]
    InvalidFilename(String),
    #[error("malformed content: {0}")]
    MalformedContent(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unable to fetch file: {0}")]
    FetchFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(filename: &str) -> Self { Self::NotFound(filename.to_string()) }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self { Self::FetchFailed(e.to_string()) }
}
