//! Discovery of a writable local cache directory.
//!
//! Serverless and container runtimes often mount the working directory
//! read-only. The resolver walks an ordered candidate list, probes each one
//! by creating it and writing a zero-byte file, and remembers the first
//! directory that accepted the probe (or that none did) until reset.

use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crownshield_core_store::Error;

/// Name of the zero-byte file written and removed while probing.
pub const PROBE_FILE_NAME: &str = ".write-test";

/// Last-resort candidate, tried after the working directory.
pub const FALLBACK_DIR: &str = "/tmp/crownshield";

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseDir {
    Writable(PathBuf),
    /// No candidate accepted a write; the local cache is disabled.
    Unavailable,
}

impl BaseDir {
    pub fn path(&self) -> Option<&Path> {
        match self {
            BaseDir::Writable(path) => Some(path),
            BaseDir::Unavailable => None,
        }
    }
}

struct ResolverState {
    override_candidates: Option<Vec<PathBuf>>,
    resolved: Option<BaseDir>,
}

/// Finds and memoizes the first writable directory among its candidates.
///
/// Each instance owns its cache, so independent resolvers (one per test,
/// say) never observe each other's results.
///
/// ```rust,no_run
/// use crownshield_json_store::{BaseDir, WritableDirectoryResolver};
///
/// # async fn demo() -> Result<(), crownshield_core_store::Error> {
/// let resolver = WritableDirectoryResolver::new(Some("/var/lib/crownshield".into()));
/// if let BaseDir::Writable(dir) = resolver.resolve().await? {
///     println!("caching datasets under {}", dir.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct WritableDirectoryResolver {
    preferred: Option<PathBuf>,
    state: Mutex<ResolverState>,
}

impl WritableDirectoryResolver {
    /// Resolver over the default candidates, optionally led by an
    /// operator-configured directory.
    pub fn new(preferred: Option<PathBuf>) -> Self {
        Self {
            preferred,
            state: Mutex::new(ResolverState {
                override_candidates: None,
                resolved: None,
            }),
        }
    }

    /// Resolver over an explicit candidate list, ignoring the defaults.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            preferred: None,
            state: Mutex::new(ResolverState {
                override_candidates: Some(candidates),
                resolved: None,
            }),
        }
    }

    /// `[preferred?, cwd, /tmp/crownshield]`.
    ///
    /// The working directory is left out when it cannot be determined.
    pub fn default_candidates(preferred: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(preferred) = preferred {
            candidates.push(preferred.to_path_buf());
        }
        match std::env::current_dir() {
            Ok(cwd) => candidates.push(cwd),
            Err(error) => {
                tracing::warn!(%error, "working directory unavailable, not probing it");
            }
        }
        candidates.push(PathBuf::from(FALLBACK_DIR));
        candidates
    }

    /// The list the next resolution will probe.
    pub async fn candidates(&self) -> Vec<PathBuf> {
        let state = self.state.lock().await;
        self.candidates_for(&state)
    }

    fn candidates_for(&self, state: &ResolverState) -> Vec<PathBuf> {
        match &state.override_candidates {
            Some(candidates) => candidates.clone(),
            None => Self::default_candidates(self.preferred.as_deref()),
        }
    }

    /// The memoized result, without probing.
    pub async fn cached(&self) -> Option<BaseDir> {
        self.state.lock().await.resolved.clone()
    }

    /// Return the memoized base directory, probing candidates on first use.
    ///
    /// Candidates rejected as read-only or permission-denied, or occupied
    /// by a file, are skipped. Any other I/O failure aborts resolution
    /// and leaves nothing memoized.
    pub async fn resolve(&self) -> Result<BaseDir, Error> {
        let mut state = self.state.lock().await;
        if let Some(resolved) = &state.resolved {
            return Ok(resolved.clone());
        }

        let mut outcome = BaseDir::Unavailable;
        for candidate in self.candidates_for(&state) {
            if probe(&candidate).await? {
                outcome = BaseDir::Writable(candidate);
                break;
            }
        }

        match &outcome {
            BaseDir::Writable(dir) => {
                tracing::info!(dir = %dir.display(), "resolved local dataset directory");
            }
            BaseDir::Unavailable => {
                tracing::warn!("no writable local directory, local cache disabled");
            }
        }

        state.resolved = Some(outcome.clone());
        Ok(outcome)
    }

    /// Forget the memoized result so the next `resolve` probes again.
    pub async fn reset(&self) {
        self.state.lock().await.resolved = None;
    }

    /// Replace the candidate list wholesale and reset.
    pub async fn override_candidates(&self, candidates: Vec<PathBuf>) {
        self.set_override(Some(candidates)).await;
    }

    /// Go back to the default candidates and reset.
    pub async fn clear_override(&self) {
        self.set_override(None).await;
    }

    async fn set_override(&self, candidates: Option<Vec<PathBuf>>) {
        let mut state = self.state.lock().await;
        state.override_candidates = candidates;
        state.resolved = None;
    }
}

impl Default for WritableDirectoryResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Whether the medium rejected a write as read-only or permission-denied.
pub fn is_readonly_error(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
    )
}

/// A file already occupying the candidate path counts as unwritable too.
fn is_unusable_candidate(error: &io::Error) -> bool {
    is_readonly_error(error) || error.kind() == io::ErrorKind::AlreadyExists
}

async fn probe(dir: &Path) -> Result<bool, Error> {
    match try_probe(dir).await {
        Ok(()) => Ok(true),
        Err(error) if is_unusable_candidate(&error) => {
            tracing::warn!(dir = %dir.display(), %error, "candidate directory not writable");
            Ok(false)
        }
        Err(error) => Err(Error::io(dir, error)),
    }
}

async fn try_probe(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let probe = dir.join(PROBE_FILE_NAME);
    tokio::fs::write(&probe, b"").await?;
    match tokio::fs::remove_file(&probe).await {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
        _ => Ok(()),
    }
}
