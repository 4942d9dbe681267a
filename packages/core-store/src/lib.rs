//! Core dataset persistence types.
//!
//! This layer names things; it stores nothing itself:
//! - `DatasetKey`: the closed set of whole-collection datasets
//! - `LogicalPath`: the backend-agnostic key a dataset is stored under
//! - `ObjectBackend`: async keyed get/put, implemented by the local cache
//!   and the remote object store
//! - `Fetched` / `WriteOutcome`: tagged results at every backend boundary
//!
//! # Example
//!
//! ```rust
//! use crownshield_core_store::{DatasetKey, Fetched, LogicalPath, ObjectBackend, Error};
//!
//! async fn raw_users(backend: &dyn ObjectBackend) -> Result<Option<String>, Error> {
//!     let path: LogicalPath = DatasetKey::Users.logical_path();
//!     Ok(backend.get(&path).await?.into_option())
//! }
//! ```

mod dataset;
mod error;
mod path;
mod traits;

pub use dataset::{DatasetKey, UnknownDataset};
pub use error::Error;
pub use path::{LogicalPath, PathError};
pub use traits::{DisabledBackend, Fetched, ObjectBackend, WriteOutcome};
