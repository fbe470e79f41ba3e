//! Allowlist Gate
//!
//! Decides which operations are cacheable at all.

use std::collections::HashMap;

/// Operation name -> enabled flag. Unknown operations are disabled.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: HashMap<String, bool>,
}

impl AllowList {
    pub fn new(allowed: HashMap<String, bool>) -> Self {
        Self { allowed }
    }

    /// Returns true only for operations explicitly enabled.
    pub fn is_allowed(&self, operation: &str) -> bool {
        self.allowed.get(operation).copied().unwrap_or(false)
    }
}
