//! # crownshield-http
//!
//! The remote object store backend.
//!
//! ```ignore
//! use crownshield_http::{RemoteConfig, RemoteObjectBackend};
//! use crownshield_core_store::{DatasetKey, ObjectBackend};
//!
//! let mut config = RemoteConfig::disabled()?;
//! config.public_base_url = Some("https://cdn.example.com/".parse()?);
//! config.token = Some(token);
//! let remote = RemoteObjectBackend::new(config)?;
//!
//! // GET https://cdn.example.com/data/users.json
//! let users = remote.get(&DatasetKey::Users.logical_path()).await?;
//! ```

pub mod error;
pub mod remote;

pub use error::Error;
pub use remote::{
    RemoteConfig, RemoteObjectBackend, DEFAULT_API_URL, DEFAULT_TIMEOUT, JSON_CONTENT_TYPE,
};
