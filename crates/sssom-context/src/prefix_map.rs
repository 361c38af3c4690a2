//! Prefix maps and the conflict-reporting merge used to combine them.
//!
//! A [`PrefixMap`] binds CURIE prefixes (`skos`) to namespace URIs
//! (`http://www.w3.org/2004/02/skos/core#`). Iteration is ordered by prefix so
//! that diagnostics and serialised headers are reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curie::is_absolute_uri;
use crate::error::{ContextError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixMap(BTreeMap<String, String>);

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, returning the previous binding if any.
    pub fn insert(
        &mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(prefix.into(), namespace.into())
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.0.contains_key(prefix)
    }

    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        self.0.remove(prefix)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn prefixes(&self) -> BTreeSet<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// The prefix bound to exactly `namespace`, if any (first in prefix order).
    pub fn prefix_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.iter().find(|(_, ns)| *ns == namespace).map(|(p, _)| p)
    }

    /// A new map holding only the bindings whose prefix is in `keep`.
    pub fn restricted_to<'a>(&self, keep: impl IntoIterator<Item = &'a str>) -> PrefixMap {
        let keep: BTreeSet<&str> = keep.into_iter().collect();
        self.iter()
            .filter(|(prefix, _)| keep.contains(prefix))
            .collect()
    }

    /// Namespaces bound under more than one prefix, with the prefixes sharing each.
    ///
    /// Not an error, but usually a sign that two sources disagree on naming.
    pub fn shared_namespaces(&self) -> Vec<(String, Vec<String>)> {
        let mut by_namespace: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for (prefix, namespace) in self.iter() {
            by_namespace
                .entry(namespace)
                .or_default()
                .push(prefix.to_string());
        }
        by_namespace
            .into_iter()
            .filter(|(_, prefixes)| prefixes.len() > 1)
            .map(|(namespace, prefixes)| (namespace.to_string(), prefixes))
            .collect()
    }

    /// Check that every binding is a non-empty absolute URI, and log shared namespaces.
    pub fn validate(&self) -> Result<()> {
        for (prefix, namespace) in self.iter() {
            if namespace.is_empty() {
                return Err(ContextError::EmptyNamespace {
                    prefix: prefix.to_string(),
                });
            }
            if !is_absolute_uri(namespace) {
                return Err(ContextError::RelativeNamespace {
                    prefix: prefix.to_string(),
                    namespace: namespace.to_string(),
                });
            }
        }
        for (namespace, prefixes) in self.shared_namespaces() {
            tracing::warn!(
                namespace = %namespace,
                prefixes = %prefixes.join(", "),
                "namespace is bound under more than one prefix"
            );
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PrefixMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for PrefixMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        PrefixMap(map)
    }
}

impl From<PrefixMap> for BTreeMap<String, String> {
    fn from(map: PrefixMap) -> Self {
        map.0
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Which side of a merge wins when both bind the same prefix differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    Primary,
    Secondary,
}

/// A prefix bound to two different namespaces across merged sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixConflict {
    pub prefix: String,
    pub kept: String,
    pub overridden: String,
}

impl fmt::Display for PrefixConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prefix `{}` kept as <{}>, overriding <{}>",
            self.prefix, self.kept, self.overridden
        )
    }
}

/// Merge two prefix maps without touching either input.
///
/// Bindings present on only one side are copied. Where both sides bind a
/// prefix to different namespaces, `precedence` picks the surviving value and
/// the disagreement is returned as a [`PrefixConflict`]; callers decide how
/// loudly to report it.
pub fn merge_prefix_maps(
    primary: &PrefixMap,
    secondary: &PrefixMap,
    precedence: Precedence,
) -> (PrefixMap, Vec<PrefixConflict>) {
    let mut merged = primary.clone();
    let mut conflicts = Vec::new();

    for (prefix, namespace) in secondary.iter() {
        match primary.get(prefix) {
            None => {
                merged.insert(prefix, namespace);
            }
            Some(existing) if existing == namespace => {}
            Some(existing) => {
                let (kept, overridden) = match precedence {
                    Precedence::Primary => (existing, namespace),
                    Precedence::Secondary => (namespace, existing),
                };
                merged.insert(prefix, kept);
                conflicts.push(PrefixConflict {
                    prefix: prefix.to_string(),
                    kept: kept.to_string(),
                    overridden: overridden.to_string(),
                });
            }
        }
    }

    (merged, conflicts)
}
