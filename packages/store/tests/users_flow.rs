//! Registration-style flow: an `update` on `users` that rejects duplicate
//! emails with a domain error.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crownshield_core_store::{DatasetKey, DisabledBackend, Error};
use crownshield_json_store::{LocalCacheBackend, WritableDirectoryResolver};
use crownshield_store::records::{UserRecord, Users};
use crownshield_store::DatasetStore;

#[derive(Debug)]
enum RegisterError {
    EmailTaken,
    Store(Error),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::EmailTaken => write!(f, "email already registered"),
            RegisterError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl From<Error> for RegisterError {
    fn from(error: Error) -> Self {
        RegisterError::Store(error)
    }
}

fn store_in(dir: &Path) -> Arc<DatasetStore> {
    let resolver = WritableDirectoryResolver::with_candidates(vec![dir.to_path_buf()]);
    let local = LocalCacheBackend::new(Arc::new(resolver));
    Arc::new(DatasetStore::new(Arc::new(local), Arc::new(DisabledBackend)))
}

async fn register(
    store: &DatasetStore,
    email: &str,
    display_name: &str,
) -> Result<UserRecord, RegisterError> {
    let user = UserRecord {
        id: Uuid::new_v4().to_string(),
        email: email.to_lowercase(),
        password_hash: format!("hash-of-{}", display_name),
        display_name: display_name.to_string(),
        avatar_url: None,
        bio: None,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let candidate = user.clone();
    store
        .update_dataset::<Users, RegisterError, _, _>(|mut users| async move {
            if users.iter().any(|existing| existing.email == candidate.email) {
                return Err(RegisterError::EmailTaken);
            }
            users.push(candidate);
            Ok(users)
        })
        .await?;

    Ok(user)
}

#[tokio::test]
async fn test_concurrent_duplicate_registration_persists_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    let (first, second) = tokio::join!(
        register(&store, "ada@example.com", "Ada"),
        register(&store, "Ada@Example.com", "Ada L."),
    );

    let (winner, loser) = match (first, second) {
        (Ok(user), Err(e)) | (Err(e), Ok(user)) => (user, e),
        other => panic!("expected exactly one registration to succeed, got {:?}", other),
    };
    assert!(matches!(loser, RegisterError::EmailTaken));

    let file = DatasetKey::Users.logical_path().to_fs_path(dir.path());
    let persisted: Vec<UserRecord> =
        serde_json::from_str(&std::fs::read_to_string(file).unwrap()).unwrap();

    assert_eq!(persisted, vec![winner]);
}

#[tokio::test]
async fn test_distinct_emails_both_register() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    register(&store, "ada@example.com", "Ada").await.unwrap();
    register(&store, "grace@example.com", "Grace").await.unwrap();

    let users = store.read_dataset::<Users>().await.unwrap();
    let emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
    assert_eq!(emails, vec!["ada@example.com", "grace@example.com"]);
}

#[tokio::test]
async fn test_rejection_message() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    register(&store, "ada@example.com", "Ada").await.unwrap();
    let err = register(&store, "ada@example.com", "Imposter").await.unwrap_err();

    assert_eq!(err.to_string(), "email already registered");
}
