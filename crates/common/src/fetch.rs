//! Remote file retrieval.
//!
//! Downloads raw file content (for instance a Bitbucket/GitHub "raw" link)
//! with a fixed request timeout. Only a `200 OK` response counts as success.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::CoreError;

/// Default timeout for remote fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Derive the target filename from the last path segment of `url`.
///
/// Query strings and fragments are ignored, so
/// `https://host/repo/raw/config.yml?at=main` yields `config.yml`.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.last()?;
    if last.is_empty() {
        return None;
    }
    Some(last.to_string())
}

#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    pub async fn fetch_text(&self, url: &str) -> Result<String, CoreError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::Network(e.to_string()))?;
        let status = resp.status();
        debug!(%url, status = status.as_u16(), "remote fetch completed");
        if status != StatusCode::OK {
            return Err(CoreError::Status(status.as_u16()));
        }
        resp.text().await.map_err(|e| CoreError::Parse(e.to_string()))
    }
}
