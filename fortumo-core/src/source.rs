//! Retrieval of the service description document.
//!
//! The description is published by the aggregator at a per-service URL, but
//! a local copy works just as well. [`source_from_location`] picks the right
//! implementation for a configured location string.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors that can occur while fetching the description.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { url: Url, status: u16 },
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

/// Somewhere a service description can be fetched from.
#[async_trait]
pub trait ServiceXmlSource: Send + Sync {
    /// Fetch the raw document.
    async fn fetch(&self) -> Result<Bytes, SourceError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// A description stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ServiceXmlSource for FileSource {
    async fn fetch(&self) -> Result<Bytes, SourceError> {
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = contents.len(), "read service description");
        Ok(Bytes::from(contents))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A description served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: Url,
    http: reqwest::Client,
}

impl HttpSource {
    /// Create a source with its own client bounded by `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, http })
    }

    /// Replace the HTTP client (e.g. to configure a proxy).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }
}

#[async_trait]
impl ServiceXmlSource for HttpSource {
    async fn fetch(&self) -> Result<Bytes, SourceError> {
        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().await?;
        debug!(url = %self.url, bytes = body.len(), "fetched service description");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Build a source for `location`: `http`/`https` URLs are fetched over the
/// network, `file` URLs and anything that is not a URL are read from disk.
pub fn source_from_location(
    location: &str,
    timeout: Duration,
) -> Result<Box<dyn ServiceXmlSource>, SourceError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(SourceError::InvalidLocation("empty location".to_owned()));
    }
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpSource::new(url, timeout)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| SourceError::InvalidLocation(location.to_owned()))?;
            Ok(Box::new(FileSource::new(path)))
        }
        // Plain paths, including Windows drive letters that parse as schemes.
        _ => Ok(Box::new(FileSource::new(location))),
    }
}
