use std::sync::Arc;

use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::{Map, Value};

use crownshield_core_store::{DatasetKey, DisabledBackend, ObjectBackend};
use crownshield_json_store::{InMemoryBackend, LocalCacheBackend, WritableDirectoryResolver};
use crownshield_store::DatasetStore;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        "[a-zA-Z0-9 _\\-\"\\\\é/]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,8}", inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn dataset_key() -> impl Strategy<Value = DatasetKey> {
    prop::sample::select(DatasetKey::ALL.to_vec())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn local_backend(dir: &std::path::Path) -> Arc<dyn ObjectBackend> {
    let resolver = WritableDirectoryResolver::with_candidates(vec![dir.to_path_buf()]);
    Arc::new(LocalCacheBackend::new(Arc::new(resolver)))
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn write_then_read_local_only(key in dataset_key(), value in json_value()) {
        let dir = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(local_backend(dir.path()), Arc::new(DisabledBackend));

        let read_back: Value = runtime().block_on(async {
            store.write(key, &value).await.unwrap();
            store.read(key, Value::Null).await.unwrap()
        });

        prop_assert_eq!(read_back, value);
    }

    #[test]
    fn write_then_read_with_remote(key in dataset_key(), value in json_value()) {
        let dir = tempfile::tempdir().unwrap();
        let remote = InMemoryBackend::new();
        let store = DatasetStore::new(local_backend(dir.path()), Arc::new(remote.clone()));

        let read_back: Value = runtime().block_on(async {
            store.write(key, &value).await.unwrap();
            store.read(key, Value::Null).await.unwrap()
        });

        prop_assert_eq!(&read_back, &value);
        prop_assert_eq!(
            remote.object(&key.logical_path()),
            Some(serde_json::to_string(&value).unwrap())
        );
        let cached = std::fs::read_to_string(key.logical_path().to_fs_path(dir.path())).unwrap();
        prop_assert_eq!(serde_json::from_str::<Value>(&cached).unwrap(), value);
    }
}
