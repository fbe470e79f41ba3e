//! Request options passed alongside every cached operation
//!
//! The options bag mirrors the parameters the API client sends with a call
//! (`dbid`, `qid`, `query`, `clist`, ...). Only a subset of them feeds the
//! cache key; see `cache::key`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Database identifier used when the options carry no `dbid`.
pub const DEFAULT_DBID: &str = "main";

/// Parameter bag for a single API operation.
///
/// # Fields
/// Arbitrary string keys mapped to JSON values. Unknown keys are kept but
/// ignored by key derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestOptions(Map<String, Value>);

impl RequestOptions {
    /// Creates an empty options bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a parameter, returning the updated bag
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Shorthand for `with("dbid", dbid)`
    pub fn for_db(self, dbid: impl Into<String>) -> Self {
        self.with("dbid", dbid.into())
    }

    /// Returns a parameter if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the database identifier, or `"main"` when absent
    pub fn dbid(&self) -> String {
        self.get("dbid")
            .map(render_value)
            .unwrap_or_else(|| DEFAULT_DBID.to_string())
    }

    /// Returns the rendered form of a parameter used in key parts
    pub fn part(&self, name: &str) -> Option<String> {
        self.get(name).map(render_value)
    }
}

impl From<Map<String, Value>> for RequestOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Strings are used verbatim, everything else as compact JSON text.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
