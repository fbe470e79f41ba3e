//! Caller-facing models
//!
//! The options bag and TTL override passed into every cache operation.

pub mod options;
pub mod ttl;

// Re-export commonly used types
pub use options::{RequestOptions, DEFAULT_DBID};
pub use ttl::Ttl;
