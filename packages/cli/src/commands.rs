//! Operator commands.
//!
//! - `resolve` - print the local dataset directory, or `none`
//! - `read <dataset>` - print a dataset as pretty JSON, seeding it if absent
//! - `write <dataset> <file|->` - replace a dataset from a JSON file or stdin
//! - `limit <caller> <key> --window-ms N --max N` - run one limiter check

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use serde_json::Value as JsonValue;
use tokio::io::AsyncReadExt;

use crownshield_core_store::DatasetKey;
use crownshield_json_store::{BaseDir, WritableDirectoryResolver};
use crownshield_store::{DatasetStore, RateLimitOptions, RateLimiter, StoreConfig};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] crownshield_core_store::Error),

    #[error("failed to read {source_name}: {error}")]
    Input {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("invalid JSON in {source_name}: {error}")]
    Json {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved local dataset directory
    Resolve,

    /// Print a dataset as pretty JSON
    Read {
        /// One of: users, videos, comments, likes, views, catalog, ratelimits
        dataset: DatasetKey,
    },

    /// Replace a dataset with the JSON in a file (`-` for stdin)
    Write { dataset: DatasetKey, input: PathBuf },

    /// Record one event for a caller and report whether it was limited
    Limit {
        caller: String,
        key: String,
        #[arg(long)]
        window_ms: i64,
        #[arg(long)]
        max: usize,
    },
}

/// The resolver and store one invocation works against.
pub struct CliContext {
    resolver: Arc<WritableDirectoryResolver>,
    store: Arc<DatasetStore>,
}

impl CliContext {
    pub fn from_config(config: &StoreConfig) -> Result<Self, CliError> {
        let resolver = Arc::new(WritableDirectoryResolver::new(config.data_dir.clone()));
        let store = DatasetStore::with_resolver(config, Arc::clone(&resolver))?;
        Ok(Self {
            resolver,
            store: Arc::new(store),
        })
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }
}

/// Run `command`, returning the text to print.
pub async fn execute(command: Command, ctx: &CliContext) -> Result<String, CliError> {
    match command {
        Command::Resolve => match ctx.resolver.resolve().await? {
            BaseDir::Writable(dir) => Ok(dir.display().to_string()),
            BaseDir::Unavailable => Ok("none".to_string()),
        },
        Command::Read { dataset } => {
            let value: JsonValue = ctx.store.read(dataset, dataset.empty_value()).await?;
            serde_json::to_string_pretty(&value).map_err(|error| CliError::Json {
                source_name: dataset.to_string(),
                error,
            })
        }
        Command::Write { dataset, input } => {
            let value = load_json(&input).await?;
            ctx.store.write(dataset, &value).await?;
            Ok(format!("wrote {}", dataset))
        }
        Command::Limit {
            caller,
            key,
            window_ms,
            max,
        } => {
            let limiter = RateLimiter::new(Arc::clone(&ctx.store));
            let options = RateLimitOptions::new(key, window_ms, max);
            let limited = limiter.is_limited(&caller, &options).await?;
            Ok(if limited { "limited" } else { "allowed" }.to_string())
        }
    }
}

async fn load_json(input: &Path) -> Result<JsonValue, CliError> {
    let source_name = input.display().to_string();

    let text = if input.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map(|_| text)
    } else {
        tokio::fs::read_to_string(input).await
    }
    .map_err(|error| CliError::Input {
        source_name: source_name.clone(),
        error,
    })?;

    serde_json::from_str(&text).map_err(|error| CliError::Json { source_name, error })
}
