//! API Cache - admin tool for a two-tier API response cache
//!
//! Loads, saves, clears and purges entries in a cache directory using the
//! same configuration rules as the library.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_cache::cli::{run, Cli};

/// Main entry point for the `api-cache` tool.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Parse command-line arguments
/// 3. Build configuration and run the requested command
/// 4. Print the result on stdout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    let output = run(cli).await?;
    println!("{}", output);
    Ok(())
}
