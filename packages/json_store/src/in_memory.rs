//! In-memory object backend.
//!
//! Behaves like a remote object store that lives for the life of the value:
//! useful as a stand-in for the remote backend in tests and local tooling.
//! Clones share the same objects.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crownshield_core_store::{Error, Fetched, LogicalPath, ObjectBackend, WriteOutcome};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Get(String),
    Put(String),
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, String>,
    operations: Vec<Operation>,
    fail_gets: Option<u16>,
    fail_puts: Option<u16>,
}

#[derive(Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an object.
    pub fn with_object(self, path: &LogicalPath, content: impl Into<String>) -> Self {
        self.lock().objects.insert(path.to_string(), content.into());
        self
    }

    /// Make every `get` fail as if the store answered with `status`.
    pub fn fail_gets_with(self, status: u16) -> Self {
        self.lock().fail_gets = Some(status);
        self
    }

    /// Make every `put` fail as if the store answered with `status`.
    pub fn fail_puts_with(self, status: u16) -> Self {
        self.lock().fail_puts = Some(status);
        self
    }

    /// Current content of an object, without recording a call.
    pub fn object(&self, path: &LogicalPath) -> Option<String> {
        self.lock().objects.get(&path.to_string()).cloned()
    }

    /// Every call made so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().operations.clone()
    }

    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn injected_failure(path: &LogicalPath, status: u16) -> Error {
    Error::RemoteStatus {
        path: path.to_string(),
        status,
        reason: "injected failure".to_string(),
    }
}

#[async_trait]
impl ObjectBackend for InMemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, Error> {
        let mut inner = self.lock();
        inner.operations.push(Operation::Get(path.to_string()));
        if let Some(status) = inner.fail_gets {
            return Err(injected_failure(path, status));
        }
        Ok(inner.objects.get(&path.to_string()).cloned().into())
    }

    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, Error> {
        let mut inner = self.lock();
        inner.operations.push(Operation::Put(path.to_string()));
        if let Some(status) = inner.fail_puts {
            return Err(injected_failure(path, status));
        }
        inner.objects.insert(path.to_string(), content.to_string());
        Ok(WriteOutcome::Stored)
    }
}
