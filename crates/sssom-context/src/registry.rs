//! Prefix registry: the built-in prefix set and the operations that keep a
//! user prefix map consistent with it.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::context::{
    external_context, is_built_in_prefix, sssom_context, SSSOM_BUILT_IN_PREFIXES,
};
use crate::error::{ContextError, Result};
use crate::prefix_map::{merge_prefix_maps, Precedence, PrefixConflict, PrefixMap};

/// Canonical namespaces for [`SSSOM_BUILT_IN_PREFIXES`].
pub fn built_in_prefix_map() -> &'static PrefixMap {
    static MAP: OnceLock<PrefixMap> = OnceLock::new();
    MAP.get_or_init(|| {
        sssom_context()
            .prefixes
            .restricted_to(SSSOM_BUILT_IN_PREFIXES)
    })
}

/// Every prefix of the built-in context, gaps filled from the external context.
///
/// On disagreement the built-in context wins; each conflict is logged.
pub fn default_extended_prefix_map() -> PrefixMap {
    let (merged, conflicts) = merge_prefix_maps(
        &sssom_context().prefixes,
        &external_context().prefixes,
        Precedence::Primary,
    );
    for conflict in &conflicts {
        tracing::warn!(
            prefix = %conflict.prefix,
            kept = %conflict.kept,
            ignored = %conflict.overridden,
            "external context disagrees with the built-in context"
        );
    }
    merged
}

/// Extend `user_map` with any missing built-in prefixes.
///
/// A user binding that differs from a built-in default is kept and reported.
pub fn reconcile(user_map: Option<&PrefixMap>) -> PrefixMap {
    reconcile_with_report(user_map).0
}

/// [`reconcile`], also returning the built-in bindings the user map overrode.
pub fn reconcile_with_report(user_map: Option<&PrefixMap>) -> (PrefixMap, Vec<PrefixConflict>) {
    let built_in = built_in_prefix_map();
    let user_map = match user_map {
        Some(map) if !map.is_empty() => map,
        _ => return (built_in.clone(), Vec::new()),
    };

    let (merged, conflicts) = merge_prefix_maps(user_map, built_in, Precedence::Primary);
    for conflict in &conflicts {
        tracing::warn!(
            prefix = %conflict.prefix,
            kept = %conflict.kept,
            default = %conflict.overridden,
            "built-in prefix is specified but differs from the default"
        );
    }
    (merged, conflicts)
}

/// Reduce `prefix_map` to the prefixes in `used`, always retaining built-ins.
///
/// With `strict`, a used prefix that `prefix_map` does not define is an
/// error naming every such prefix. Otherwise it is left unresolved.
pub fn prune_to_used(
    prefix_map: &PrefixMap,
    used: &BTreeSet<String>,
    strict: bool,
) -> Result<PrefixMap> {
    let missing: Vec<String> = used
        .iter()
        .filter(|prefix| !prefix_map.contains_prefix(prefix))
        .cloned()
        .collect();

    if strict && !missing.is_empty() {
        return Err(ContextError::UndefinedPrefix { prefixes: missing });
    }
    if !missing.is_empty() {
        tracing::debug!(
            missing = %missing.join(", "),
            "prefixes in use have no binding; leaving them unresolved"
        );
    }

    Ok(prefix_map
        .iter()
        .filter(|(prefix, _)| used.contains(*prefix) || is_built_in_prefix(prefix))
        .collect())
}
