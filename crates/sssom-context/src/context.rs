//! Embedded JSON-LD contexts.
//!
//! Two contexts ship with the crate:
//!
//! - the **built-in** SSSOM context, generated from the SSSOM schema. It
//!   provides the canonical namespaces for the built-in prefixes and marks
//!   which slots hold entity identifiers (`"@type": "@id"`);
//! - the **external** context, a curated list of common third-party
//!   namespaces used to fill gaps in user prefix maps.
//!
//! Both are parsed lazily on first access and cached for the life of the
//! process. The cached values are never mutated; accessors hand out shared
//! references or clones.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde_json::Value;

use crate::error::{ContextError, Result};
use crate::prefix_map::PrefixMap;

/// Prefixes every valid SSSOM prefix map must define.
pub const SSSOM_BUILT_IN_PREFIXES: [&str; 5] = ["sssom", "owl", "rdf", "rdfs", "skos"];

const SSSOM_CONTEXT_NAME: &str = "sssom.context.jsonld";
const SSSOM_EXTERNAL_CONTEXT_NAME: &str = "sssom.external.context.jsonld";

const SSSOM_CONTEXT: &str = include_str!("../context/sssom.context.jsonld");
const SSSOM_EXTERNAL_CONTEXT: &str = include_str!("../context/sssom.external.context.jsonld");

/// The parts of a JSON-LD `@context` this crate cares about.
#[derive(Debug, Clone, Default)]
pub struct JsonLdContext {
    /// Prefix definitions: plain string terms and `{"@id", "@prefix": true}` terms.
    pub prefixes: PrefixMap,
    /// Terms declared with `"@type": "@id"`.
    pub identifier_slots: BTreeSet<String>,
}

impl JsonLdContext {
    pub fn parse(name: &'static str, text: &str) -> Result<Self> {
        let malformed = |message: String| ContextError::MalformedContext { name, message };

        let document: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
        let terms = document
            .get("@context")
            .and_then(Value::as_object)
            .ok_or_else(|| malformed("missing `@context` object".to_string()))?;

        let mut out = JsonLdContext::default();
        for (term, definition) in terms {
            if term.starts_with('@') {
                continue;
            }
            match definition {
                Value::String(namespace) => {
                    out.prefixes.insert(term.clone(), namespace.clone());
                }
                Value::Object(fields) => {
                    let is_prefix = fields.get("@prefix").and_then(Value::as_bool) == Some(true);
                    if is_prefix {
                        let namespace = fields
                            .get("@id")
                            .and_then(Value::as_str)
                            .ok_or_else(|| {
                                malformed(format!("prefix term `{term}` has no `@id`"))
                            })?;
                        out.prefixes.insert(term.clone(), namespace);
                    }
                    if fields.get("@type").and_then(Value::as_str) == Some("@id") {
                        out.identifier_slots.insert(term.clone());
                    }
                }
                _ => {
                    return Err(malformed(format!(
                        "term `{term}` must be a string or an object"
                    )))
                }
            }
        }
        Ok(out)
    }
}

/// The built-in SSSOM context.
pub fn sssom_context() -> &'static JsonLdContext {
    static CONTEXT: OnceLock<JsonLdContext> = OnceLock::new();
    CONTEXT.get_or_init(|| {
        JsonLdContext::parse(SSSOM_CONTEXT_NAME, SSSOM_CONTEXT)
            .expect("embedded SSSOM context is well-formed")
    })
}

/// The external (third-party namespaces) context.
pub fn external_context() -> &'static JsonLdContext {
    static CONTEXT: OnceLock<JsonLdContext> = OnceLock::new();
    CONTEXT.get_or_init(|| {
        JsonLdContext::parse(SSSOM_EXTERNAL_CONTEXT_NAME, SSSOM_EXTERNAL_CONTEXT)
            .expect("embedded external context is well-formed")
    })
}

pub fn is_built_in_prefix(prefix: &str) -> bool {
    SSSOM_BUILT_IN_PREFIXES.contains(&prefix)
}
