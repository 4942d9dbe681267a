//! Logical paths: the backend-agnostic key a dataset is stored under.
//!
//! The same logical path addresses a dataset in the remote object store
//! (appended to the base URL) and in the local cache (joined onto the
//! resolved base directory), so components are restricted to a portable
//! subset that is safe in both.

use std::fmt;
use std::path::PathBuf;

/// Errors related to logical path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path component is not allowed.
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid as a whole.
    InvalidPath { message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidComponent {
                component,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path component '{}' at position {}: {}",
                    component, position, message
                )
            }
            PathError::InvalidPath { message } => {
                write!(f, "invalid path: {}", message)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A validated, relative, `/`-separated storage key such as
/// `data/users.json`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogicalPath {
    components: Vec<String>,
}

impl LogicalPath {
    /// Parse a logical path.
    ///
    /// ```rust
    /// use crownshield_core_store::LogicalPath;
    ///
    /// let path = LogicalPath::parse("catalog/index.json").unwrap();
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path.to_string(), "catalog/index.json");
    ///
    /// assert!(LogicalPath::parse("/etc/passwd").is_err());
    /// assert!(LogicalPath::parse("data/../secrets.json").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::InvalidPath {
                message: "logical path must not be empty".to_string(),
            });
        }
        if s.starts_with('/') {
            return Err(PathError::InvalidPath {
                message: format!("logical path '{}' must be relative", s),
            });
        }
        if s.ends_with('/') {
            return Err(PathError::InvalidPath {
                message: format!("logical path '{}' must name an object, not a prefix", s),
            });
        }

        let components: Vec<String> = s.split('/').map(str::to_string).collect();
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }

        Ok(LogicalPath { components })
    }

    /// Build a path from components known to be valid at compile time.
    pub(crate) fn from_static(components: &[&'static str]) -> Self {
        LogicalPath {
            components: components.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        let invalid = |message: &str| PathError::InvalidComponent {
            component: component.to_string(),
            position,
            message: message.to_string(),
        };

        if component.is_empty() {
            return Err(invalid("empty component"));
        }
        if component == "." || component == ".." {
            return Err(invalid("relative segments are not allowed"));
        }
        if let Some(c) = component
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: format!("invalid character '{}'", c.escape_default()),
            });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(String::as_str)
    }

    /// The final component, e.g. `users.json`.
    pub fn file_name(&self) -> &str {
        self.components.last().map(String::as_str).unwrap_or_default()
    }

    /// Resolve this path beneath a local base directory.
    pub fn to_fs_path(&self, base: &std::path::Path) -> PathBuf {
        let mut out = base.to_path_buf();
        out.extend(self.components.iter());
        out
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::str::FromStr for LogicalPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalPath::parse(s)
    }
}
