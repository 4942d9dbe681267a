//! # crownshield-cli
//!
//! Operator commands for inspecting and repairing Crownshield datasets.
//!
//! ## Usage
//!
//! ```bash
//! crownshield resolve
//! crownshield read users
//! crownshield write catalog ./catalog.json
//! echo '[]' | crownshield write ratelimits -
//! crownshield limit 203.0.113.9 comment --window-ms 60000 --max 3
//! ```
//!
//! Configuration comes from the environment (`DATA_DIR`,
//! `BLOB_READ_WRITE_TOKEN`, `BLOB_PUBLIC_BASE_URL`, ...). Set `RUST_LOG`
//! for diagnostics.

pub mod commands;

pub use commands::{execute, CliContext, CliError, Command};
