//! Key Deriver
//!
//! Maps `(operation, options)` to a stable file name. The parts
//! `[operation, dbid, ...fields]` are joined with `:` and hashed as a
//! version-5 UUID under the configured namespace.

use uuid::Uuid;

use crate::models::RequestOptions;

/// File extension of serialized entries.
pub const KEY_EXTENSION: &str = ".json";

const PART_SEPARATOR: &str = ":";

const QUERY_FIELDS: &[&str] = &["qid", "qname", "query", "clist", "slist", "options"];

/// Option fields that take part in the key, in order, for an operation.
pub fn key_fields(operation: &str) -> &'static [&'static str] {
    match operation {
        "API_DoQuery" | "API_DoQueryCount" | "API_GenResultsTable" => QUERY_FIELDS,
        "API_GetRecordInfo" => &["rid"],
        "API_GetUserRole" => &["userid"],
        "API_GetUserInfo" => &["email"],
        _ => &[],
    }
}

/// Derives cache keys within a namespace.
#[derive(Debug, Clone, Copy)]
pub struct KeyDeriver {
    namespace: Uuid,
}

impl KeyDeriver {
    pub fn new(namespace: Uuid) -> Self {
        Self { namespace }
    }

    /// Ordered key parts; absent fields are skipped.
    pub fn parts(operation: &str, options: &RequestOptions) -> Vec<String> {
        let mut parts = vec![operation.to_string(), options.dbid()];
        parts.extend(
            key_fields(operation)
                .iter()
                .filter_map(|field| options.part(field)),
        );
        parts
    }

    /// Returns `<uuid-v5>.json` for the operation and options.
    pub fn derive(&self, operation: &str, options: &RequestOptions) -> String {
        let joined = Self::parts(operation, options).join(PART_SEPARATOR);
        let id = Uuid::new_v5(&self.namespace, joined.as_bytes());
        format!("{}{}", id.hyphenated(), KEY_EXTENSION)
    }
}
