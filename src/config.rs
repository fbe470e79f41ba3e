//! Configuration Module
//!
//! Built once per engine: storage location, key namespace, the allowlist and
//! per-operation TTLs. Defaults can be overridden from environment variables
//! or merged with a JSON overrides document.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{CacheError, Result};

/// Namespace seed used for key derivation unless overridden.
pub const DEFAULT_NAMESPACE: Uuid = Uuid::from_u128(0x8b6f3c1e_2d4a_5f70_9c3e_1a2b3c4d5e6f);

/// Fallback TTL in milliseconds for operations with no configured timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

const HOUR_MS: u64 = 60 * 60 * 1000;
const FIFTEEN_MIN_MS: u64 = 15 * 60 * 1000;
const MINUTE_MS: u64 = 60 * 1000;

/// Read-only operations that are cacheable out of the box.
const CACHEABLE_OPERATIONS: &[(&str, u64)] = &[
    ("API_DoQuery", MINUTE_MS),
    ("API_DoQueryCount", MINUTE_MS),
    ("API_GenResultsTable", MINUTE_MS),
    ("API_GetNumRecords", MINUTE_MS),
    ("API_GetRecordInfo", MINUTE_MS),
    ("API_GetSchema", HOUR_MS),
    ("API_GetDBInfo", HOUR_MS),
    ("API_GetRoleInfo", HOUR_MS),
    ("API_GetAppDTMInfo", HOUR_MS),
    ("API_GetUserRole", FIFTEEN_MIN_MS),
    ("API_GetUserInfo", FIFTEEN_MIN_MS),
    ("API_UserRoles", FIFTEEN_MIN_MS),
];

/// Mutating operations, listed so that they stay disabled after a merge
/// that only touches other entries.
const UNCACHEABLE_OPERATIONS: &[&str] = &[
    "API_AddRecord",
    "API_EditRecord",
    "API_DeleteRecord",
    "API_PurgeRecords",
    "API_ImportFromCSV",
    "API_SetFieldProperties",
    "API_Authenticate",
];

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one `<key>.json` file per entry
    pub location: PathBuf,
    /// Namespace seed for key derivation
    pub namespace: Uuid,
    /// Operation name -> cacheable flag; absent means disabled
    pub allowed: HashMap<String, bool>,
    /// Operation name -> default TTL in milliseconds
    pub data_timeouts: HashMap<String, u64>,
    /// TTL in milliseconds for operations missing from `data_timeouts`
    pub default_timeout: u64,
}

/// Partial configuration merged over the defaults.
///
/// Field names follow the JSON settings file (`dataTimeouts`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub location: Option<PathBuf>,
    pub namespace: Option<Uuid>,
    pub allowed: HashMap<String, bool>,
    pub data_timeouts: HashMap<String, u64>,
    pub default_timeout: Option<u64>,
}

impl ConfigOverrides {
    /// Reads overrides from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CacheError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parses overrides from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| CacheError::InvalidConfig(e.to_string()))
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_CACHE_LOCATION` - Cache directory (default: platform cache dir)
    /// - `API_CACHE_NAMESPACE` - Key namespace UUID (ignored if malformed)
    /// - `API_CACHE_DEFAULT_TIMEOUT` - Fallback TTL in ms (default: 60000)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    /// Empty or unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            location: lookup("API_CACHE_LOCATION")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.location),
            namespace: lookup("API_CACHE_NAMESPACE")
                .and_then(|v| Uuid::parse_str(&v).ok())
                .unwrap_or(defaults.namespace),
            default_timeout: lookup("API_CACHE_DEFAULT_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_timeout),
            ..defaults
        }
    }

    /// Merges overrides over this configuration. Scalars are replaced,
    /// maps are merged entry by entry.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(location) = overrides.location {
            self.location = location;
        }
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        if let Some(default_timeout) = overrides.default_timeout {
            self.default_timeout = default_timeout;
        }
        self.allowed.extend(overrides.allowed);
        self.data_timeouts.extend(overrides.data_timeouts);
        self
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_namespace(mut self, namespace: Uuid) -> Self {
        self.namespace = namespace;
        self
    }

    /// Enables or disables caching for an operation.
    pub fn allow(mut self, operation: impl Into<String>, enabled: bool) -> Self {
        self.allowed.insert(operation.into(), enabled);
        self
    }

    /// Sets the default TTL (ms) for an operation.
    pub fn with_timeout(mut self, operation: impl Into<String>, ttl_ms: u64) -> Self {
        self.data_timeouts.insert(operation.into(), ttl_ms);
        self
    }

    /// Default TTL in milliseconds for an operation.
    pub fn timeout_for(&self, operation: &str) -> u64 {
        self.data_timeouts
            .get(operation)
            .copied()
            .unwrap_or(self.default_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        let location = ProjectDirs::from("", "", "api-cache")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".api-cache"));

        let mut allowed: HashMap<String, bool> = CACHEABLE_OPERATIONS
            .iter()
            .map(|(op, _)| (op.to_string(), true))
            .collect();
        allowed.extend(UNCACHEABLE_OPERATIONS.iter().map(|op| (op.to_string(), false)));

        let data_timeouts = CACHEABLE_OPERATIONS
            .iter()
            .map(|(op, ttl)| (op.to_string(), *ttl))
            .collect();

        Self {
            location,
            namespace: DEFAULT_NAMESPACE,
            allowed,
            data_timeouts,
            default_timeout: DEFAULT_TIMEOUT_MS,
        }
    }
}
