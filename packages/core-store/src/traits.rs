//! Backend traits: the keyed get/put surface every storage medium exposes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Error, LogicalPath};

/// Outcome of a backend read.
///
/// Absence is a normal result, distinct from both empty content
/// (`Found(String::new())`) and a backend malfunction (`Err`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Found(T),
    Absent,
}

impl<T> Fetched<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Fetched::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Found(value) => Some(value),
            Fetched::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Found(value) => Fetched::Found(f(value)),
            Fetched::Absent => Fetched::Absent,
        }
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Fetched::Found(value),
            None => Fetched::Absent,
        }
    }
}

/// Outcome of a backend write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The content was persisted.
    Stored,
    /// The medium rejected the write as read-only or permission-denied and
    /// the write was discarded.
    Dropped,
    /// The backend is not configured, so nothing was attempted.
    Skipped,
}

/// Keyed whole-object storage.
///
/// # Object Safety
///
/// This trait is object-safe: the dataset store holds its backends as
/// `Arc<dyn ObjectBackend>`.
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Whether `put` can persist anything at all.
    ///
    /// A disabled backend still accepts calls; it just reports
    /// [`WriteOutcome::Skipped`].
    fn writes_enabled(&self) -> bool {
        true
    }

    /// Read the full content stored under `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(Fetched::Absent)` - Nothing is stored under the path.
    /// * `Ok(Fetched::Found(text))` - The stored content.
    /// * `Err(Error)` - The backend malfunctioned.
    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, Error>;

    /// Replace the full content stored under `path`.
    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, Error>;
}

#[async_trait]
impl<T: ObjectBackend + ?Sized> ObjectBackend for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn writes_enabled(&self) -> bool {
        (**self).writes_enabled()
    }

    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, Error> {
        (**self).get(path).await
    }

    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, Error> {
        (**self).put(path, content).await
    }
}

#[async_trait]
impl<T: ObjectBackend + ?Sized> ObjectBackend for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn writes_enabled(&self) -> bool {
        (**self).writes_enabled()
    }

    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, Error> {
        (**self).get(path).await
    }

    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, Error> {
        (**self).put(path, content).await
    }
}

/// A backend that stores nothing and finds nothing.
///
/// Stands in for the remote store when it is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

#[async_trait]
impl ObjectBackend for DisabledBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn writes_enabled(&self) -> bool {
        false
    }

    async fn get(&self, _path: &LogicalPath) -> Result<Fetched<String>, Error> {
        Ok(Fetched::Absent)
    }

    async fn put(&self, _path: &LogicalPath, _content: &str) -> Result<WriteOutcome, Error> {
        Ok(WriteOutcome::Skipped)
    }
}
