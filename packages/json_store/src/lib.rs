//! JSON dataset backends that live on this machine: the local cache
//! directory and an in-memory object store.

pub mod in_memory;
pub mod local_disk;
pub mod resolver;

pub use in_memory::{InMemoryBackend, Operation};
pub use local_disk::LocalCacheBackend;
pub use resolver::{
    is_readonly_error, BaseDir, WritableDirectoryResolver, FALLBACK_DIR, PROBE_FILE_NAME,
};
