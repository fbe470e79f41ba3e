//! TTL override accepted by `save`

use std::fmt;
use std::str::FromStr;

/// How long a saved entry stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Use the per-operation timeout from configuration
    #[default]
    Default,
    /// Never expires (stored as `exp: -1`)
    Never,
    /// Expires after the given number of milliseconds
    Millis(u64),
}

impl Ttl {
    /// Maps the wire convention onto a TTL: `-1` never expires, any other
    /// negative value falls back to the default, otherwise milliseconds.
    pub fn from_millis(ms: i64) -> Self {
        match ms {
            -1 => Ttl::Never,
            ms if ms < 0 => Ttl::Default,
            ms => Ttl::Millis(ms as u64),
        }
    }
}

impl From<Option<u64>> for Ttl {
    fn from(ms: Option<u64>) -> Self {
        ms.map(Ttl::Millis).unwrap_or_default()
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Default => write!(f, "default"),
            Ttl::Never => write!(f, "never"),
            Ttl::Millis(ms) => write!(f, "{}ms", ms),
        }
    }
}

impl FromStr for Ttl {
    type Err = String;

    /// Accepts `default`, `never`, or a millisecond count (`-1` = never).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Ttl::Default),
            "never" => Ok(Ttl::Never),
            other => other
                .parse::<i64>()
                .map(Ttl::from_millis)
                .map_err(|_| format!("Invalid TTL '{}': use ms, never or default", s)),
        }
    }
}
