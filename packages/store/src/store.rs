//! The dataset store: a remote object store layered over a local cache.
//!
//! ## Policy
//!
//! - `read` asks the remote backend first, then the local cache. When
//!   neither has the dataset, the caller's fallback is seeded into both
//!   (local best effort, remote mandatory when writes are enabled) and
//!   returned.
//! - `write` replaces the dataset in both backends. The local copy is
//!   pretty-printed, the remote copy compact.
//! - `update` is read, apply, write. Updates to the same key through one
//!   store instance run one at a time; updates from different instances or
//!   processes race, and the last write wins.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crownshield_core_store::{
    DatasetKey, Error, Fetched, LogicalPath, ObjectBackend, WriteOutcome,
};
use crownshield_http::RemoteObjectBackend;
use crownshield_json_store::{LocalCacheBackend, WritableDirectoryResolver};

use crate::config::StoreConfig;
use crate::records::Dataset;

const KEY_COUNT: usize = DatasetKey::ALL.len();

pub struct DatasetStore {
    local: Arc<dyn ObjectBackend>,
    remote: Arc<dyn ObjectBackend>,
    update_locks: [Mutex<()>; KEY_COUNT],
}

impl DatasetStore {
    pub fn new(local: Arc<dyn ObjectBackend>, remote: Arc<dyn ObjectBackend>) -> Self {
        Self {
            local,
            remote,
            update_locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Wire the local cache and remote backend described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self, Error> {
        let resolver = Arc::new(WritableDirectoryResolver::new(config.data_dir.clone()));
        Self::with_resolver(config, resolver)
    }

    /// Like [`DatasetStore::from_config`], sharing an existing resolver.
    pub fn with_resolver(
        config: &StoreConfig,
        resolver: Arc<WritableDirectoryResolver>,
    ) -> Result<Self, Error> {
        let local = LocalCacheBackend::new(resolver);
        let remote = RemoteObjectBackend::new(config.remote_config()?)?;
        Ok(Self::new(Arc::new(local), Arc::new(remote)))
    }

    pub fn local(&self) -> &Arc<dyn ObjectBackend> {
        &self.local
    }

    pub fn remote(&self) -> &Arc<dyn ObjectBackend> {
        &self.remote
    }

    /// Current value of `key`, seeding `fallback` on the first-ever read.
    pub async fn read<T>(&self, key: DatasetKey, fallback: T) -> Result<T, Error>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = key.logical_path();

        if let Fetched::Found(content) = self.remote.get(&path).await? {
            tracing::debug!(dataset = %key, "read from remote");
            return decode(&path, &content);
        }

        if let Fetched::Found(content) = self.local.get(&path).await? {
            tracing::debug!(dataset = %key, "read from local cache");
            return decode(&path, &content);
        }

        tracing::info!(dataset = %key, "dataset absent everywhere, seeding fallback");
        self.persist(key, &path, &fallback).await?;
        Ok(fallback)
    }

    /// Replace the persisted value of `key`.
    pub async fn write<T>(&self, key: DatasetKey, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let path = key.logical_path();
        self.persist(key, &path, value).await
    }

    /// Read `key`, transform it with `apply`, and persist the result.
    ///
    /// Updates to the same key through this store run one at a time, and
    /// the key's lock is held while `apply` runs: an `apply` that calls
    /// `update` (or `RateLimiter::is_limited`, for `ratelimits`) on the same
    /// key through the same store deadlocks.
    ///
    /// An error from `apply` aborts the update before anything is written.
    /// Store failures convert into the caller's error type.
    ///
    /// ```rust,no_run
    /// use crownshield_core_store::{DatasetKey, Error};
    /// use crownshield_store::DatasetStore;
    ///
    /// # async fn demo(store: &DatasetStore) -> Result<(), Error> {
    /// let tags = store
    ///     .update(DatasetKey::Likes, Vec::<String>::new(), |mut likes| async move {
    ///         likes.push("like-1".to_string());
    ///         Ok::<_, Error>(likes)
    ///     })
    ///     .await?;
    /// # let _ = tags;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update<T, E, F, Fut>(&self, key: DatasetKey, fallback: T, apply: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let _queued = self.update_locks[key as usize].lock().await;

        let current = self.read(key, fallback).await?;
        let next = apply(current).await?;
        self.write(key, &next).await?;
        Ok(next)
    }

    pub async fn read_dataset<D: Dataset>(&self) -> Result<D::Value, Error> {
        self.read(D::KEY, D::fallback()).await
    }

    pub async fn write_dataset<D: Dataset>(&self, value: &D::Value) -> Result<(), Error> {
        self.write(D::KEY, value).await
    }

    pub async fn update_dataset<D, E, F, Fut>(&self, apply: F) -> Result<D::Value, E>
    where
        D: Dataset,
        E: From<Error>,
        F: FnOnce(D::Value) -> Fut,
        Fut: Future<Output = Result<D::Value, E>>,
    {
        self.update(D::KEY, D::fallback(), apply).await
    }

    async fn persist<T>(&self, key: DatasetKey, path: &LogicalPath, value: &T) -> Result<(), Error>
    where
        T: Serialize + ?Sized,
    {
        let pretty = serde_json::to_string_pretty(value).map_err(|source| Error::Encode {
            path: path.to_string(),
            source,
        })?;
        let outcome = self.local.put(path, &pretty).await?;
        if outcome != WriteOutcome::Stored {
            tracing::debug!(dataset = %key, ?outcome, "local copy not stored");
        }

        if self.remote.writes_enabled() {
            let compact = serde_json::to_string(value).map_err(|source| Error::Encode {
                path: path.to_string(),
                source,
            })?;
            self.remote.put(path, &compact).await?;
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(path: &LogicalPath, content: &str) -> Result<T, Error> {
    serde_json::from_str(content).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}
