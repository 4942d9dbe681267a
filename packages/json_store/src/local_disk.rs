//! Local filesystem cache backend.
//!
//! Objects live as plain files under the directory chosen by a
//! [`WritableDirectoryResolver`]; `data/users.json` becomes
//! `{base}/data/users.json`. A read-only medium degrades this backend to a
//! no-op rather than failing requests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crownshield_core_store::{Error, Fetched, LogicalPath, ObjectBackend, WriteOutcome};

use crate::resolver::{is_readonly_error, BaseDir, WritableDirectoryResolver};

pub struct LocalCacheBackend {
    resolver: Arc<WritableDirectoryResolver>,
}

impl LocalCacheBackend {
    pub fn new(resolver: Arc<WritableDirectoryResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<WritableDirectoryResolver> {
        &self.resolver
    }

    /// Where `path` lives on disk, or `None` when no directory is writable.
    pub async fn file_path(&self, path: &LogicalPath) -> Result<Option<PathBuf>, Error> {
        Ok(match self.resolver.resolve().await? {
            BaseDir::Writable(base) => Some(path.to_fs_path(&base)),
            BaseDir::Unavailable => None,
        })
    }
}

#[async_trait]
impl ObjectBackend for LocalCacheBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get(&self, path: &LogicalPath) -> Result<Fetched<String>, Error> {
        let Some(file_path) = self.file_path(path).await? else {
            return Ok(Fetched::Absent);
        };

        tracing::debug!(file = %file_path.display(), "reading local dataset");
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Ok(Fetched::Found(content)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Fetched::Absent),
            Err(error) => Err(Error::io(file_path, error)),
        }
    }

    async fn put(&self, path: &LogicalPath, content: &str) -> Result<WriteOutcome, Error> {
        let Some(file_path) = self.file_path(path).await? else {
            return Ok(WriteOutcome::Skipped);
        };

        tracing::debug!(file = %file_path.display(), "writing local dataset");
        match write_atomically(&file_path, content.as_bytes()).await {
            Ok(()) => Ok(WriteOutcome::Stored),
            Err(error) if is_readonly_error(&error) => {
                tracing::warn!(
                    file = %file_path.display(),
                    %error,
                    "local filesystem rejected write, dropping it"
                );
                Ok(WriteOutcome::Dropped)
            }
            Err(error) => Err(Error::io(file_path, error)),
        }
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `target` so
/// readers see either the old or the new content, never a partial file.
async fn write_atomically(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = target.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, target).await
    }
    .await;

    if result.is_err() {
        // Best effort; the temp file may never have been created.
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}
