//! The closed set of datasets and where each one lives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::path::LogicalPath;

/// Identifies one whole-collection dataset.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKey {
    Users,
    Videos,
    Comments,
    Likes,
    Views,
    Catalog,
    RateLimits,
}

impl DatasetKey {
    pub const ALL: [DatasetKey; 7] = [
        DatasetKey::Users,
        DatasetKey::Videos,
        DatasetKey::Comments,
        DatasetKey::Likes,
        DatasetKey::Views,
        DatasetKey::Catalog,
        DatasetKey::RateLimits,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKey::Users => "users",
            DatasetKey::Videos => "videos",
            DatasetKey::Comments => "comments",
            DatasetKey::Likes => "likes",
            DatasetKey::Views => "views",
            DatasetKey::Catalog => "catalog",
            DatasetKey::RateLimits => "ratelimits",
        }
    }

    /// The storage key shared by the remote and local backends.
    pub fn logical_path(self) -> LogicalPath {
        match self {
            DatasetKey::Users => LogicalPath::from_static(&["data", "users.json"]),
            DatasetKey::Videos => LogicalPath::from_static(&["data", "videos.json"]),
            DatasetKey::Comments => LogicalPath::from_static(&["data", "comments.json"]),
            DatasetKey::Likes => LogicalPath::from_static(&["data", "likes.json"]),
            DatasetKey::Views => LogicalPath::from_static(&["data", "views.json"]),
            DatasetKey::Catalog => LogicalPath::from_static(&["catalog", "index.json"]),
            DatasetKey::RateLimits => LogicalPath::from_static(&["data", "ratelimits.json"]),
        }
    }

    /// Untyped empty value for the dataset: `[]`, or `{"videos": []}` for
    /// the catalog.
    pub fn empty_value(self) -> JsonValue {
        match self {
            DatasetKey::Catalog => json!({ "videos": [] }),
            _ => json!([]),
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dataset '{0}'")]
pub struct UnknownDataset(pub String);

impl FromStr for DatasetKey {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}
