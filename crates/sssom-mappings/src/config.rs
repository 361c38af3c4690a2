use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings shared by table construction and the set operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingSetConfig {
    /// Identifier columns scanned for prefixes in addition to
    /// subject/predicate/object (e.g. `creator_id`).
    pub identifier_columns: Vec<String>,
    /// Fail prefix-map pruning when a used prefix has no binding.
    pub strict_prefix_cleaning: bool,
    /// Run redundancy and negation reconciliation after a merge.
    pub reconcile_on_merge: bool,
    /// Extra or replacement predicate inverses, applied over the SSSOM defaults.
    pub inverse_predicates: BTreeMap<String, String>,
}

impl Default for MappingSetConfig {
    fn default() -> Self {
        Self {
            identifier_columns: Vec::new(),
            strict_prefix_cleaning: false,
            reconcile_on_merge: true,
            inverse_predicates: BTreeMap::new(),
        }
    }
}

impl MappingSetConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
