//! Error types shared by every dataset backend.
//!
//! "Absent" is not an error: backends report a missing key as
//! [`Fetched::Absent`](crate::Fetched::Absent). Everything in here is a
//! backend malfunction and is propagated unchanged to the caller.

use std::path::PathBuf;

use crate::path::PathError;

/// Errors raised by the dataset persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Local filesystem failure other than a read-only or permission
    /// rejection.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote object store answered with a non-success status other
    /// than 404.
    #[error("remote store returned {status} {reason} for {path}")]
    RemoteStatus {
        path: String,
        status: u16,
        reason: String,
    },

    /// The remote request could not be completed (connect, timeout, body).
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Persisted content could not be parsed as the requested dataset shape.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A dataset value could not be serialized.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    InvalidPath(#[from] PathError),

    /// Invalid environment or programmatic configuration.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn io_error_display_includes_path() {
        let e = Error::io(
            "/tmp/crownshield/data/users.json",
            std::io::Error::new(std::io::ErrorKind::StorageFull, "no space left"),
        );
        let display = format!("{}", e);
        assert!(display.contains("/tmp/crownshield/data/users.json"));
        assert!(display.contains("no space left"));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn remote_status_display() {
        let e = Error::RemoteStatus {
            path: "data/videos.json".to_string(),
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(
            format!("{}", e),
            "remote store returned 503 Service Unavailable for data/videos.json"
        );
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        let e = Error::Decode {
            path: "data/likes.json".to_string(),
            source,
        };
        assert!(format!("{}", e).contains("data/likes.json"));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn config_error_display() {
        let e = Error::config("BLOB_TIMEOUT_MS must be a number");
        assert_eq!(
            format!("{}", e),
            "invalid configuration: BLOB_TIMEOUT_MS must be a number"
        );
    }
}
