//! Catalog fetching over HTTP or from a local file.

use std::path::PathBuf;
use std::time::Duration;

use meetdir_core::session::CatalogSource;
use meetdir_core::{MeetDirError, MeetDirResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the catalog JSON lives.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Http(String),
    File(PathBuf),
}

impl DataSource {
    /// http(s) URLs are fetched; anything else is read as a file path.
    pub fn parse(location: &str) -> Self {
        match url::Url::parse(location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                DataSource::Http(location.to_string())
            }
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => DataSource::File(path),
                Err(()) => DataSource::File(PathBuf::from(location)),
            },
            _ => DataSource::File(PathBuf::from(location)),
        }
    }
}

impl CatalogSource for DataSource {
    async fn fetch(&self) -> MeetDirResult<serde_json::Value> {
        match self {
            DataSource::Http(url) => fetch_http(url).await,
            DataSource::File(path) => {
                tracing::debug!(path = %path.display(), "reading catalog");
                let text = tokio::fs::read_to_string(path).await?;
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

/// Single GET, no retry.
async fn fetch_http(url: &str) -> MeetDirResult<serde_json::Value> {
    tracing::debug!(%url, "fetching catalog");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| MeetDirError::Fetch(e.to_string()))?;

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| MeetDirError::Fetch(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(MeetDirError::Fetch(format!(
            "{} returned {}",
            url,
            resp.status()
        )));
    }

    resp.json()
        .await
        .map_err(|e| MeetDirError::Parse(e.to_string()))
}
