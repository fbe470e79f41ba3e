//! Cache Entry Module
//!
//! Defines the unit of storage, its on-disk shape (`{"exp": ..., "data": ...}`)
//! and the TTL predicate.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Ttl;

/// Wire value of `exp` for entries that never expire.
pub const NEVER_EXPIRES: i64 = -1;

// == Expiry ==
/// Absolute expiry of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Expiry {
    /// Never expires
    Never,
    /// Expires after this Unix timestamp in milliseconds
    At(i64),
}

impl From<i64> for Expiry {
    fn from(exp: i64) -> Self {
        if exp == NEVER_EXPIRES {
            Expiry::Never
        } else {
            Expiry::At(exp)
        }
    }
}

impl From<Expiry> for i64 {
    fn from(expiry: Expiry) -> Self {
        match expiry {
            Expiry::Never => NEVER_EXPIRES,
            Expiry::At(ms) => ms,
        }
    }
}

// == Cache Entry ==
/// A cached payload together with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Expiration timestamp, `-1` on disk for never
    pub exp: Expiry,
    /// The opaque payload
    pub data: Value,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring according to `ttl`, measured from `now`.
    ///
    /// # Arguments
    /// * `data` - The payload to store
    /// * `ttl` - The TTL override
    /// * `default_ttl_ms` - Per-operation TTL used for `Ttl::Default`
    /// * `now` - Current Unix timestamp in milliseconds
    pub fn new(data: Value, ttl: Ttl, default_ttl_ms: u64, now: i64) -> Self {
        let exp = match ttl {
            Ttl::Never => Expiry::Never,
            Ttl::Millis(ms) => Expiry::At(now.saturating_add(clamp_ms(ms))),
            Ttl::Default => Expiry::At(now.saturating_add(clamp_ms(default_ttl_ms))),
        };
        Self { exp, data }
    }

    /// True while the entry may still be served at `now`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        is_valid(self, now)
    }
}

// == TTL Evaluator ==
/// An entry is valid if it never expires or `exp >= now`. The boundary is
/// inclusive: an entry whose expiry equals `now` is still served.
pub fn is_valid(entry: &CacheEntry, now: i64) -> bool {
    match entry.exp {
        Expiry::Never => true,
        Expiry::At(exp) => exp >= now,
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn clamp_ms(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_never_expires() {
        let entry = CacheEntry::new(json!({"a": 1}), Ttl::Never, 1000, 0);

        assert_eq!(entry.exp, Expiry::Never);
        assert!(entry.is_valid_at(i64::MAX));
    }

    #[test]
    fn test_entry_uses_override() {
        let entry = CacheEntry::new(json!(1), Ttl::Millis(300), 60_000, 1_000);
        assert_eq!(entry.exp, Expiry::At(1_300));
    }

    #[test]
    fn test_entry_uses_default_ttl() {
        let entry = CacheEntry::new(json!(1), Ttl::Default, 60_000, 1_000);
        assert_eq!(entry.exp, Expiry::At(61_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            exp: Expiry::At(now),
            data: json!(null),
        };

        // exp == now is still valid, one millisecond later it is not
        assert!(is_valid(&entry, now));
        assert!(!is_valid(&entry, now + 1));

        let stale = CacheEntry {
            exp: Expiry::At(now - 1),
            data: json!(null),
        };
        assert!(!is_valid(&stale, now));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(json!(1), Ttl::Millis(u64::MAX), 0, 10);
        assert_eq!(entry.exp, Expiry::At(i64::MAX));
    }

    #[test]
    fn test_wire_format() {
        let entry = CacheEntry {
            exp: Expiry::Never,
            data: json!({"tables": []}),
        };
        let encoded = serde_json::to_value(&entry).unwrap();
        assert_eq!(encoded, json!({"exp": -1, "data": {"tables": []}}));

        let decoded: CacheEntry =
            serde_json::from_str(r#"{"exp": 1700000000000, "data": [1, 2]}"#).unwrap();
        assert_eq!(decoded.exp, Expiry::At(1_700_000_000_000));
        assert_eq!(decoded.data, json!([1, 2]));
    }

    #[test]
    fn test_missing_exp_is_rejected() {
        let result = serde_json::from_str::<CacheEntry>(r#"{"data": 1}"#);
        assert!(result.is_err());
    }
}
