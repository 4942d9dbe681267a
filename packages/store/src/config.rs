//! Environment-level configuration.
//!
//! ## Variables
//!
//! - `DATA_DIR` - preferred local base directory, tried before the defaults
//! - `BLOB_READ_WRITE_TOKEN` - remote credential; unset disables remote writes
//! - `BLOB_PUBLIC_BASE_URL` - remote public base URL; unset disables remote reads
//! - `BLOB_API_URL` - remote upload endpoint
//! - `BLOB_TIMEOUT_MS` - remote request timeout in milliseconds
//!
//! Empty values count as unset.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crownshield_core_store::Error;
use crownshield_http::{RemoteConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};

pub const DATA_DIR_VAR: &str = "DATA_DIR";
pub const TOKEN_VAR: &str = "BLOB_READ_WRITE_TOKEN";
pub const PUBLIC_BASE_URL_VAR: &str = "BLOB_PUBLIC_BASE_URL";
pub const API_URL_VAR: &str = "BLOB_API_URL";
pub const TIMEOUT_VAR: &str = "BLOB_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: Option<PathBuf>,
    pub blob_token: Option<String>,
    pub blob_public_base_url: Option<Url>,
    /// `None` uses [`DEFAULT_API_URL`].
    pub blob_api_url: Option<Url>,
    /// `None` uses [`DEFAULT_TIMEOUT`].
    pub remote_timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let url = |name: &str| -> Result<Option<Url>, Error> {
            var(name)
                .map(|raw| {
                    Url::parse(raw.trim())
                        .map_err(|e| Error::config(format!("{} is not a valid URL: {}", name, e)))
                })
                .transpose()
        };

        let remote_timeout = var(TIMEOUT_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| {
                        Error::config(format!("{} must be a number of milliseconds: {}", TIMEOUT_VAR, e))
                    })
            })
            .transpose()?;

        Ok(Self {
            data_dir: var(DATA_DIR_VAR).map(PathBuf::from),
            blob_token: var(TOKEN_VAR),
            blob_public_base_url: url(PUBLIC_BASE_URL_VAR)?,
            blob_api_url: url(API_URL_VAR)?,
            remote_timeout,
        })
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_remote(mut self, public_base_url: Url, token: impl Into<String>) -> Self {
        self.blob_public_base_url = Some(public_base_url);
        self.blob_token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.blob_api_url = Some(api_url);
        self
    }

    /// Whether any remote operation is enabled.
    pub fn remote_enabled(&self) -> bool {
        self.blob_token.is_some() || self.blob_public_base_url.is_some()
    }

    pub fn remote_config(&self) -> Result<RemoteConfig, Error> {
        let api_url = match &self.blob_api_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_API_URL)
                .map_err(|e| Error::config(format!("default API URL: {}", e)))?,
        };

        Ok(RemoteConfig {
            public_base_url: self.blob_public_base_url.clone(),
            api_url,
            token: self.blob_token.clone(),
            timeout: self.remote_timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
