//! Merging mapping sets and reconciling the merged rows.
//!
//! Reconciliation runs in two passes: [`filter_redundant_rows`] drops rows
//! outscored by another row for the same pair, then [`deal_with_negation`]
//! settles each (subject, predicate, object) between its positive and
//! negated forms.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use sssom_context::PrefixMap;

use crate::config::MappingSetConfig;
use crate::error::{MappingSetError, Result};
use crate::mapping::{Mapping, RowKey, MAPPING_JUSTIFICATION, MATCH_TYPE, PREDICATE_MODIFIER};
use crate::table::{configured_identifier_columns, MappingSetTable};

pub const MANUAL_MAPPING_CURATION: &str = "semapv:ManualMappingCuration";
pub const HUMAN_CURATED: &str = "HumanCurated";
pub const NEGATION_MODIFIER: &str = "Not";

// ============================================================================
// Redundancy
// ============================================================================

/// Keep, per (subject, object[, predicate]) group, the rows whose confidence
/// equals the group maximum. Rows without a confidence survive only in
/// groups where no row has one. Row order is preserved.
pub fn filter_redundant_rows(rows: &[Mapping], ignore_predicate: bool) -> Vec<Mapping> {
    let key = |row: &Mapping| -> (String, String, Option<String>) {
        let predicate = (!ignore_predicate).then(|| row.predicate_id.clone());
        (row.subject_id.clone(), row.object_id.clone(), predicate)
    };

    let mut best: HashMap<(String, String, Option<String>), f64> = HashMap::new();
    for row in rows {
        if let Some(confidence) = row.confidence() {
            best.entry(key(row))
                .and_modify(|max| *max = max.max(confidence))
                .or_insert(confidence);
        }
    }

    let kept: Vec<Mapping> = rows
        .iter()
        .filter(|&row| match best.get(&key(row)) {
            None => true,
            Some(max) => row.confidence().is_some_and(|c| c >= *max),
        })
        .cloned()
        .collect();
    tracing::debug!(removed = rows.len() - kept.len(), "filtered redundant rows");
    kept
}

// ============================================================================
// Negation
// ============================================================================

/// True for `!`-prefixed predicates and rows with `predicate_modifier: Not`.
pub fn is_negated(row: &Mapping) -> bool {
    row.predicate_id.starts_with('!')
        || row
            .get_text(PREDICATE_MODIFIER)
            .is_some_and(|m| m.eq_ignore_ascii_case(NEGATION_MODIFIER))
}

pub fn is_curated(row: &Mapping) -> bool {
    row.get_text(MAPPING_JUSTIFICATION) == Some(MANUAL_MAPPING_CURATION)
        || row.get_text(MATCH_TYPE) == Some(HUMAN_CURATED)
}

/// Whether `challenger` beats `incumbent`: higher confidence, then manual
/// curation, then negation. Full ties keep the incumbent.
fn outranks(challenger: &Mapping, incumbent: &Mapping) -> bool {
    let rank = |row: &Mapping| {
        (
            row.confidence().unwrap_or(f64::NEG_INFINITY),
            is_curated(row),
            is_negated(row),
        )
    };
    let (c_conf, c_curated, c_negated) = rank(challenger);
    let (i_conf, i_curated, i_negated) = rank(incumbent);
    if c_conf != i_conf {
        return c_conf > i_conf;
    }
    if c_curated != i_curated {
        return c_curated;
    }
    c_negated && !i_negated
}

/// Keep one row per (subject, predicate, object), where a negated predicate
/// is grouped with its positive form. Groups come out in order of first
/// appearance.
pub fn deal_with_negation(rows: &[Mapping]) -> Vec<Mapping> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut winners: HashMap<(String, String, String), &Mapping> = HashMap::new();

    for row in rows {
        let key = (
            row.subject_id.clone(),
            row.predicate_id.trim_start_matches('!').to_string(),
            row.object_id.clone(),
        );
        match winners.get_mut(&key) {
            Some(incumbent) => {
                if outranks(row, *incumbent) {
                    *incumbent = row;
                }
            }
            None => {
                order.push(key.clone());
                winners.insert(key, row);
            }
        }
    }

    let kept: Vec<Mapping> = order
        .iter()
        .filter_map(|key| winners.get(key).map(|row| (*row).clone()))
        .collect();
    tracing::debug!(removed = rows.len() - kept.len(), "reconciled negated mappings");
    kept
}

// ============================================================================
// Merge
// ============================================================================

/// Union two prefix maps, failing on any disagreement.
pub fn merge_prefix_maps_strict(left: &PrefixMap, right: &PrefixMap) -> Result<PrefixMap> {
    let mut merged = left.clone();
    for (prefix, namespace) in right.iter() {
        match left.get(prefix) {
            Some(existing) if existing != namespace => {
                return Err(MappingSetError::PrefixMapClash {
                    prefix: prefix.to_string(),
                    left: existing.to_string(),
                    right: namespace.to_string(),
                });
            }
            Some(_) => {}
            None => {
                if let Some(other) = merged.prefix_for_namespace(namespace) {
                    return Err(MappingSetError::NamespaceClash {
                        namespace: namespace.to_string(),
                        left: other.to_string(),
                        right: prefix.to_string(),
                    });
                }
                merged.insert(prefix, namespace);
            }
        }
    }
    Ok(merged)
}

/// Merge `secondary` into `primary` with the default configuration.
pub fn merge(
    primary: &MappingSetTable,
    secondary: &MappingSetTable,
    reconcile: bool,
) -> Result<MappingSetTable> {
    let config = MappingSetConfig {
        reconcile_on_merge: reconcile,
        ..MappingSetConfig::default()
    };
    merge_with_config(primary, secondary, &config)
}

/// Merge `secondary` into `primary`.
///
/// Each table's metadata is first pushed into its rows; rows are unioned
/// with primary rows first; prefix maps must agree; primary metadata and
/// schema are kept. With `reconcile_on_merge`, redundant and contradicted
/// rows are then removed.
pub fn merge_with_config(
    primary: &MappingSetTable,
    secondary: &MappingSetTable,
    config: &MappingSetConfig,
) -> Result<MappingSetTable> {
    let prefix_map = merge_prefix_maps_strict(primary.prefix_map(), secondary.prefix_map())?;

    let mut seen: HashSet<RowKey> = HashSet::new();
    let mut rows: Vec<Mapping> = primary
        .inject_own_metadata()
        .into_iter()
        .chain(secondary.inject_own_metadata())
        .filter(|row| seen.insert(row.row_key()))
        .collect();

    if config.reconcile_on_merge {
        rows = filter_redundant_rows(&rows, false);
        rows = deal_with_negation(&rows);
    }

    let mut identifier_columns = configured_identifier_columns(&primary.schema, config)?;
    identifier_columns.extend(primary.identifier_columns.iter().cloned());
    identifier_columns.extend(secondary.identifier_columns.iter().cloned());

    tracing::debug!(
        primary = primary.len(),
        secondary = secondary.len(),
        merged = rows.len(),
        "merged mapping sets"
    );
    Ok(MappingSetTable {
        rows,
        prefix_map,
        metadata: primary.metadata.clone(),
        schema: Arc::clone(&primary.schema),
        identifier_columns,
    })
}
