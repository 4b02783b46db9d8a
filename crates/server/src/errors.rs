use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": title, "detail": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.title, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::UnsupportedType(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Unsupported file type", Some(e.to_string()))
            }
            ServiceError::InvalidFilename(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid filename", Some(e.to_string()))
            }
            ServiceError::MalformedContent(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Malformed content", Some(e.to_string()))
            }
            ServiceError::FetchFailed(_) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Unable to fetch file", Some(e.to_string()))
            }
            ServiceError::NotFound(_) => {
                JsonApiError::new(StatusCode::NOT_FOUND, "File not found", Some(e.to_string()))
            }
            ServiceError::Io(_) => {
                error!(error = %e, "storage failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
