//! Remote object store over HTTP.
//!
//! ## Protocol
//!
//! - `get(path)` → `GET {public_base_url}/{path}` → response body text;
//!   `404` means the object does not exist
//! - `put(path, content)` → `PUT {api_url}/{path}` with the JSON text as
//!   body and the bearer token
//!
//! Reads need a public base URL and writes need a token; without them the
//! corresponding operation is a no-op, so a deployment with neither runs
//! purely on the local cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode, Url};

use crownshield_core_store::{
    Error as StoreError, Fetched, LogicalPath, ObjectBackend, WriteOutcome,
};

use crate::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Keeps the stored pathname equal to the logical path.
pub const RANDOM_SUFFIX_HEADER: &str = "x-add-random-suffix";

pub const DEFAULT_API_URL: &str = "https://blob.vercel-storage.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Where objects are publicly readable. `None` disables reads.
    pub public_base_url: Option<Url>,
    /// Where objects are uploaded.
    pub api_url: Url,
    /// Read/write credential. `None` disables writes.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Configuration with reads and writes disabled.
    pub fn disabled() -> Result<Self, Error> {
        Ok(Self {
            public_base_url: None,
            api_url: Url::parse(DEFAULT_API_URL)?,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

/// The durable backend: an HTTP object store addressed by logical path.
pub struct RemoteObjectBackend {
    client: Client,
    public_base_url: Option<Url>,
    api_url: Url,
    token: Option<String>,
}

impl RemoteObjectBackend {
    pub fn new(config: RemoteConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            public_base_url: config.public_base_url.map(directory_url).transpose()?,
            api_url: directory_url(config.api_url)?,
            token: config.token,
        })
    }

    pub fn reads_enabled(&self) -> bool {
        self.public_base_url.is_some()
    }

    fn bearer(&self) -> Result<Option<HeaderValue>, Error> {
        self.token
            .as_deref()
            .map(|token| HeaderValue::try_from(format!("Bearer {}", token)))
            .transpose()
            .map_err(Error::from)
    }
}

/// Make `base` behave as a directory under `Url::join`, which would
/// otherwise replace its last segment.
fn directory_url(mut base: Url) -> Result<Url, Error> {
    if base.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            message: format!("{} cannot be a base URL", base),
        });
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

fn object_url(base: &Url, path: &LogicalPath) -> Result<Url, Error> {
    Ok(base.join(&path.to_string())?)
}

fn status_error(path: &LogicalPath, status: StatusCode) -> StoreError {
    StoreError::RemoteStatus {
        path: path.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

#[async_trait]
impl ObjectBackend for RemoteObjectBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn writes_enabled(&self) -> bool {
        self.token.is_some()
    }

    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, StoreError> {
        let Some(base) = &self.public_base_url else {
            return Ok(Fetched::Absent);
        };

        let url = object_url(base, path)?;
        tracing::debug!(%url, "reading remote dataset");

        let mut request = self.client.get(url);
        if let Some(bearer) = self.bearer()? {
            request = request.header(reqwest::header::AUTHORIZATION, bearer);
        }
        let response = request.send().await.map_err(Error::from)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::Absent);
        }
        if !status.is_success() {
            return Err(status_error(path, status));
        }

        let body = response.text().await.map_err(Error::from)?;
        Ok(Fetched::Found(body))
    }

    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, StoreError> {
        let Some(bearer) = self.bearer()? else {
            return Ok(WriteOutcome::Skipped);
        };

        let url = object_url(&self.api_url, path)?;
        tracing::debug!(%url, bytes = content.len(), "writing remote dataset");

        let response = self
            .client
            .put(url)
            .header(reqwest::header::AUTHORIZATION, bearer)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(RANDOM_SUFFIX_HEADER, "0")
            .body(content.to_string())
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(path, status));
        }

        Ok(WriteOutcome::Stored)
    }
}
