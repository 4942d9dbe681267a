use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crownshield_cli::{execute, CliContext, CliError, Command};
use crownshield_store::StoreConfig;

/// Crownshield - inspect and repair persisted datasets
#[derive(Parser, Debug)]
#[command(name = "crownshield")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Preferred local data directory (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<String, CliError> {
    let mut config = StoreConfig::from_env()?;
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    tracing::debug!(data_dir = ?config.data_dir, remote = config.remote_enabled(), "loaded configuration");

    let ctx = CliContext::from_config(&config)?;
    execute(args.command, &ctx).await
}
