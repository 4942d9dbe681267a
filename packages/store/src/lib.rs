//! Dataset persistence for Crownshield.
//!
//! A [`DatasetStore`] layers the remote object store over a local cache
//! directory and offers `read`, `write` and `update` per dataset. The
//! [`RateLimiter`] is built entirely on `update`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use crownshield_store::{records, DatasetStore, RateLimitOptions, RateLimiter, StoreConfig};
//!
//! # async fn demo() -> Result<(), crownshield_core_store::Error> {
//! let store = Arc::new(DatasetStore::from_config(&StoreConfig::from_env()?)?);
//! let users = store.read_dataset::<records::Users>().await?;
//!
//! let limiter = RateLimiter::new(store);
//! let limited = limiter
//!     .is_limited("203.0.113.9", &RateLimitOptions::new("comment", 60_000, 3))
//!     .await?;
//! # let _ = (users, limited);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod rate_limit;
pub mod records;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use rate_limit::{check_bucket, RateLimitOptions, RateLimiter};
pub use records::Dataset;
pub use store::DatasetStore;
