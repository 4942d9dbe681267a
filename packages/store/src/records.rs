//! Typed shapes of the persisted datasets.
//!
//! Field names serialize in camelCase so existing JSON documents load
//! unchanged. Each marker type (`Users`, `Videos`, ...) binds a
//! [`DatasetKey`] to its value type and empty fallback.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crownshield_core_store::DatasetKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub video_url: String,
    pub poster_url: String,
    pub duration: f64,
    pub channel_id: String,
    pub channel_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub views: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: String,
    pub video_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub id: String,
    pub video_id: String,
    pub ip: String,
    pub created_at: String,
}

/// Denormalized catalog served to listing pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogIndex {
    pub videos: Vec<VideoRecord>,
}

/// Recent permitted events for one (caller, limiter key) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitBucket {
    /// Caller identity, usually the client IP.
    pub ip: String,
    pub key: String,
    /// Epoch milliseconds.
    pub timestamps: Vec<i64>,
    /// Window the bucket was last checked with; lets other callers' checks
    /// expire it. Absent in buckets written by older deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<i64>,
}

/// Binds a dataset key to its value type.
pub trait Dataset {
    const KEY: DatasetKey;
    type Value: Serialize + DeserializeOwned + Send + Sync;

    /// Value returned (and seeded) when the dataset has never been written.
    fn fallback() -> Self::Value;
}

macro_rules! collection_dataset {
    ($name:ident, $key:expr, $record:ty) => {
        pub struct $name;

        impl Dataset for $name {
            const KEY: DatasetKey = $key;
            type Value = Vec<$record>;

            fn fallback() -> Self::Value {
                Vec::new()
            }
        }
    };
}

collection_dataset!(Users, DatasetKey::Users, UserRecord);
collection_dataset!(Videos, DatasetKey::Videos, VideoRecord);
collection_dataset!(Comments, DatasetKey::Comments, CommentRecord);
collection_dataset!(Likes, DatasetKey::Likes, LikeRecord);
collection_dataset!(Views, DatasetKey::Views, ViewRecord);
collection_dataset!(RateLimits, DatasetKey::RateLimits, RateLimitBucket);

pub struct Catalog;

impl Dataset for Catalog {
    const KEY: DatasetKey = DatasetKey::Catalog;
    type Value = CatalogIndex;

    fn fallback() -> Self::Value {
        CatalogIndex::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_record_uses_camel_case() {
        let user = UserRecord {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hashed".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: None,
            bio: Some("hi".to_string()),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "id": "u1",
                "email": "ada@example.com",
                "passwordHash": "hashed",
                "displayName": "Ada",
                "bio": "hi",
                "createdAt": "2026-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn bucket_without_window_loads() {
        let bucket: RateLimitBucket = serde_json::from_value(json!({
            "ip": "203.0.113.9",
            "key": "comment",
            "timestamps": [1, 2, 3],
        }))
        .unwrap();

        assert_eq!(bucket.window_ms, None);
        assert_eq!(bucket.timestamps, vec![1, 2, 3]);
    }

    #[test]
    fn fallbacks_match_untyped_empty_values() {
        fn check<D: Dataset>() {
            assert_eq!(serde_json::to_value(D::fallback()).unwrap(), D::KEY.empty_value());
        }

        check::<Users>();
        check::<Videos>();
        check::<Comments>();
        check::<Likes>();
        check::<Views>();
        check::<Catalog>();
        check::<RateLimits>();
    }

    #[test]
    fn catalog_loads_from_json() {
        let catalog: CatalogIndex = serde_json::from_value(json!({
            "videos": [{
                "id": "v1",
                "title": "Intro",
                "description": "",
                "tags": ["rust"],
                "videoUrl": "https://cdn.example.com/v1.mp4",
                "posterUrl": "https://cdn.example.com/v1.jpg",
                "duration": 12.5,
                "channelId": "u1",
                "channelName": "Ada",
                "createdAt": "2026-01-01T00:00:00.000Z",
                "updatedAt": "2026-01-01T00:00:00.000Z",
                "views": 3,
                "likes": 1
            }]
        }))
        .unwrap();

        assert_eq!(catalog.videos.len(), 1);
        assert_eq!(catalog.videos[0].channel_name, "Ada");
    }
}
