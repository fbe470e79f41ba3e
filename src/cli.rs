//! Command-line interface for inspecting and maintaining a cache directory
//!
//! Parses arguments with clap and runs one cache operation per invocation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::cache::ApiCache;
use crate::config::{Config, ConfigOverrides};
use crate::models::{RequestOptions, Ttl};

/// API Cache - inspect and maintain cached API responses
#[derive(Parser, Debug)]
#[command(name = "api-cache")]
#[command(about = "Inspect and maintain a two-tier API response cache")]
#[command(version)]
pub struct Cli {
    /// JSON settings file merged over the defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache directory, overrides every other source
    #[arg(long, global = true, value_name = "DIR")]
    pub location: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the cached payload for a call, or `null` on a miss
    Load {
        operation: String,
        /// Call parameters as a JSON object, e.g. '{"dbid":"bq123","qid":1}'
        #[arg(long, value_parser = parse_options, default_value = "{}")]
        options: RequestOptions,
    },
    /// Store a JSON payload for a call
    Save {
        operation: String,
        #[arg(value_parser = parse_json)]
        payload: Value,
        #[arg(long, value_parser = parse_options, default_value = "{}")]
        options: RequestOptions,
        /// TTL in milliseconds, `never` or `default`
        #[arg(long, default_value = "default")]
        ttl: Ttl,
    },
    /// Remove the cached entry for a call
    Clear {
        operation: String,
        #[arg(long, value_parser = parse_options, default_value = "{}")]
        options: RequestOptions,
    },
    /// Print the cache key (file name) for a call
    Key {
        operation: String,
        #[arg(long, value_parser = parse_options, default_value = "{}")]
        options: RequestOptions,
    },
    /// Delete every expired entry in the cache directory
    Purge,
}

fn parse_options(s: &str) -> Result<RequestOptions, String> {
    serde_json::from_str(s).map_err(|e| format!("options must be a JSON object: {}", e))
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON payload: {}", e))
}

/// Builds the engine configuration: environment, then the settings file,
/// then `--location`.
pub fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env();
    if let Some(path) = &cli.config {
        config = config.merge(ConfigOverrides::from_file(path)?);
    }
    if let Some(location) = &cli.location {
        config = config.with_location(location);
    }
    Ok(config)
}

/// Runs the parsed command and returns what should be printed on stdout.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = build_config(&cli)?;
    let cache = ApiCache::new(config);

    let output = match cli.command {
        Command::Load { operation, options } => {
            let data = cache.load(&operation, &options).await?;
            serde_json::to_string_pretty(&data.unwrap_or(Value::Null))?
        }
        Command::Save {
            operation,
            payload,
            options,
            ttl,
        } => {
            let stored = cache.save(&operation, &options, &payload, ttl).await?;
            if stored {
                format!("saved {}", cache.key_for(&operation, &options))
            } else {
                format!("skipped: {} is not cacheable", operation)
            }
        }
        Command::Clear { operation, options } => {
            if cache.clear(&operation, &options).await? {
                format!("cleared {}", cache.key_for(&operation, &options))
            } else {
                format!("skipped: {} is not cacheable", operation)
            }
        }
        Command::Key { operation, options } => cache.key_for(&operation, &options),
        Command::Purge => {
            let removed = cache.purge_expired().await?;
            format!("purged {} expired entries", removed)
        }
    };
    Ok(output)
}
