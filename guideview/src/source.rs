//! Where guide documents come from.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use tracing::debug;

use crate::error::ViewError;

/// A fetch returning one parsed JSON document.
pub trait ContentSource {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Value, ViewError>>;
}

/// Documents stored under a directory, addressed by their path relative to it.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSource { root: root.into() }
    }

    /// `/content/x.json` and `content/x.json` both land under the root.
    pub fn resolve(&self, location: &str) -> PathBuf {
        self.root.join(location.trim_start_matches('/'))
    }
}

impl ContentSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<Value, ViewError> {
        let path = self.resolve(location);
        debug!(path = %path.display(), "reading content");
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| ViewError::fetch(location, err))?;
        serde_json::from_slice(&bytes).map_err(|err| ViewError::parse(location, err))
    }
}

/// Documents served over HTTP below a base URL. Responses are never cached.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, ViewError> {
        let base = base.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ViewError::fetch(&base, err))?;
        Ok(HttpSource { http, base })
    }

    pub fn url(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            return location.to_string();
        }
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            location.trim_start_matches('/')
        )
    }
}

impl ContentSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<Value, ViewError> {
        let url = self.url(location);
        debug!(%url, "fetching content");

        let response = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ViewError::fetch(location, "request timed out")
                } else {
                    ViewError::fetch(location, err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ViewError::fetch(location, err))?;
        serde_json::from_slice(&body).map_err(|err| ViewError::parse(location, err))
    }
}

/// The source picked by configuration.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
}

impl ContentSource for AnySource {
    async fn fetch(&self, location: &str) -> Result<Value, ViewError> {
        match self {
            AnySource::File(source) => source.fetch(location).await,
            AnySource::Http(source) => source.fetch(location).await,
        }
    }
}
