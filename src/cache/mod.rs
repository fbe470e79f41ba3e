//! Cache Module
//!
//! Two-tier response cache: allowlist gate, key derivation, TTL entries,
//! the on-disk store and the engine tying them together.

mod allowlist;
mod engine;
mod entry;
mod key;
mod stats;
mod storage;


// Re-export public types
pub use allowlist::AllowList;
pub use engine::ApiCache;
pub use entry::{current_timestamp_ms, is_valid, CacheEntry, Expiry, NEVER_EXPIRES};
pub use key::{key_fields, KeyDeriver, KEY_EXTENSION};
pub use stats::CacheStats;
pub use storage::{FsStore, PersistentStore};
