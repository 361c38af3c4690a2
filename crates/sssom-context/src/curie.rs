//! Compact identifier (CURIE) expansion and contraction.
//!
//! Resolution is always done against an explicit [`PrefixMap`]. An identifier
//! that cannot be expanded is not an error here: partial prefix maps are the
//! normal state of real-world mapping sets, so callers choose the policy.

use std::sync::OnceLock;

use regex::Regex;

use crate::prefix_map::PrefixMap;

/// URI schemes that are absolute without a `//` authority part.
const OPAQUE_SCHEMES: [&str; 4] = ["urn", "mailto", "tag", "data"];

fn curie_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*:[A-Za-z0-9_]").expect("CURIE pattern is valid")
    })
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
}

/// True for `scheme://...` URIs and the handful of opaque schemes in common use.
pub fn is_absolute_uri(s: &str) -> bool {
    match s.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => {
            rest.starts_with("//") || OPAQUE_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

/// True when `s` is shaped like `prefix:local` and is not an absolute URI.
pub fn is_curie(s: &str) -> bool {
    curie_pattern().is_match(s) && !is_absolute_uri(s)
}

/// Split `prefix:local` on the first separator.
pub fn split_curie(s: &str) -> Option<(&str, &str)> {
    let (prefix, local) = s.split_once(':')?;
    if prefix.is_empty() || local.starts_with("//") {
        return None;
    }
    Some((prefix, local))
}

/// The prefix component of a CURIE; `None` for URIs and anything unprefixed.
pub fn prefix_of(s: &str) -> Option<&str> {
    if !is_curie(s) {
        return None;
    }
    split_curie(s).map(|(prefix, _)| prefix)
}

/// Expand a CURIE against `prefix_map`.
///
/// Absolute URIs come back unchanged; identifiers whose prefix is unbound
/// yield `None`.
pub fn expand(id: &str, prefix_map: &PrefixMap) -> Option<String> {
    if let Some((prefix, local)) = split_curie(id) {
        if let Some(namespace) = prefix_map.get(prefix) {
            return Some(format!("{namespace}{local}"));
        }
    }
    if is_absolute_uri(id) {
        return Some(id.to_string());
    }
    None
}

/// Expand `id`, or log it as unresolved and return it as given.
pub fn expand_or_passthrough(id: &str, prefix_map: &PrefixMap) -> String {
    match expand(id, prefix_map) {
        Some(iri) => iri,
        None => {
            tracing::warn!(identifier = %id, "unable to expand identifier; passing it through");
            id.to_string()
        }
    }
}

/// Contract `uri` using the longest namespace in `prefix_map` it starts with.
///
/// Without a match the input is returned unchanged.
pub fn contract(uri: &str, prefix_map: &PrefixMap) -> String {
    let best = prefix_map
        .iter()
        .filter(|(_, namespace)| !namespace.is_empty() && uri.starts_with(namespace))
        .max_by_key(|(_, namespace)| namespace.len());

    match best {
        Some((prefix, namespace)) => format!("{prefix}:{}", &uri[namespace.len()..]),
        None => {
            if is_absolute_uri(uri) {
                tracing::warn!(
                    uri = %uri,
                    "no namespace in the prefix map matches; leaving URI uncontracted"
                );
            }
            uri.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obo() -> PrefixMap {
        [
            ("obo", "http://purl.obolibrary.org/obo/"),
            ("GO", "http://purl.obolibrary.org/obo/GO_"),
            ("skos", "http://www.w3.org/2004/02/skos/core#"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn recognises_curies_and_uris() {
        assert!(is_curie("GO:0008150"));
        assert!(is_curie("orcid:0000-0001-5839-2535"));
        assert!(is_curie("a.b:c"));
        assert!(!is_curie("http://purl.obolibrary.org/obo/GO_0008150"));
        assert!(!is_curie("urn:isbn:0451450523"));
        assert!(!is_curie("noColon"));
        assert!(!is_curie(":local"));

        assert!(is_absolute_uri("https://w3id.org/sssom/"));
        assert!(is_absolute_uri("urn:isbn:0451450523"));
        assert!(!is_absolute_uri("GO:0008150"));
        assert!(!is_absolute_uri("w3id.org/sssom/"));
    }

    #[test]
    fn prefix_of_ignores_uris() {
        assert_eq!(prefix_of("GO:0008150"), Some("GO"));
        assert_eq!(prefix_of("http://example.org/x"), None);
        assert_eq!(prefix_of("https://example.org/x"), None);
        assert_eq!(prefix_of("plain"), None);
    }

    #[test]
    fn expand_known_unknown_and_absolute() {
        let m = obo();
        assert_eq!(
            expand("GO:0008150", &m).as_deref(),
            Some("http://purl.obolibrary.org/obo/GO_0008150")
        );
        assert_eq!(
            expand("http://example.org/x", &m).as_deref(),
            Some("http://example.org/x")
        );
        assert_eq!(expand("HP:0000001", &m), None);
        assert_eq!(expand_or_passthrough("HP:0000001", &m), "HP:0000001");
    }

    #[test]
    fn contract_prefers_longest_namespace() {
        let m = obo();
        assert_eq!(
            contract("http://purl.obolibrary.org/obo/GO_0008150", &m),
            "GO:0008150"
        );
        assert_eq!(
            contract("http://purl.obolibrary.org/obo/HP_0000001", &m),
            "obo:HP_0000001"
        );
        assert_eq!(
            contract("http://example.org/unknown", &m),
            "http://example.org/unknown"
        );
    }

    #[test]
    fn contract_then_expand_is_identity_for_bound_namespaces() {
        let m = obo();
        let iri = "http://www.w3.org/2004/02/skos/core#exactMatch";
        let curie = contract(iri, &m);
        assert_eq!(curie, "skos:exactMatch");
        assert_eq!(expand(&curie, &m).as_deref(), Some(iri));
    }
}
