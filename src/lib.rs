//! API Cache - A two-tier response cache for remote API operations
//!
//! Caches the responses of an enumerable set of API calls in memory and on
//! disk, keyed by a namespace-seeded hash of the call and its parameters,
//! with per-operation TTLs and an allowlist of cacheable operations.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;

pub use cache::{ApiCache, CacheStats, FsStore, PersistentStore};
pub use config::{Config, ConfigOverrides};
pub use error::{CacheError, Result};
pub use models::{RequestOptions, Ttl};
