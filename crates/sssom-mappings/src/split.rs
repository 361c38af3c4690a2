//! Splitting a mapping set into one set per (subject prefix, predicate, object prefix).

use std::collections::{BTreeMap, BTreeSet};

use sssom_context::curie::split_curie;
use sssom_context::{prefix_of, prune_to_used};

use crate::config::MappingSetConfig;
use crate::error::Result;
use crate::mapping::Mapping;
use crate::table::MappingSetTable;

/// Name of one split: `{subject_prefix}_{predicate_local}_{object_prefix}`, lower case.
fn split_name(subject_prefix: &str, predicate: &str, object_prefix: &str) -> String {
    let positive = predicate.trim_start_matches('!');
    let local = split_curie(positive).map_or(positive, |(_, local)| local);
    let local = if positive.len() == predicate.len() {
        local.to_string()
    } else {
        format!("not_{local}")
    };
    format!("{subject_prefix}_{local}_{object_prefix}").to_lowercase()
}

/// Restricts which combinations [`split_by_prefix_selected`] produces.
///
/// `None` admits every value seen in the table. Relations are matched against
/// the full predicate CURIE, including a leading `!` for negated rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSelection {
    pub subject_prefixes: Option<BTreeSet<String>>,
    pub object_prefixes: Option<BTreeSet<String>>,
    pub relations: Option<BTreeSet<String>>,
}

impl SplitSelection {
    pub fn new<S, O, R>(subject_prefixes: S, object_prefixes: O, relations: R) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            subject_prefixes: Some(subject_prefixes.into_iter().map(Into::into).collect()),
            object_prefixes: Some(object_prefixes.into_iter().map(Into::into).collect()),
            relations: Some(relations.into_iter().map(Into::into).collect()),
        }
    }

    fn admits(&self, subject_prefix: &str, predicate: &str, object_prefix: &str) -> bool {
        let allows = |set: &Option<BTreeSet<String>>, value: &str| {
            set.as_ref().map_or(true, |set| set.contains(value))
        };
        allows(&self.subject_prefixes, subject_prefix)
            && allows(&self.relations, predicate)
            && allows(&self.object_prefixes, object_prefix)
    }
}

pub fn split_by_prefix(table: &MappingSetTable) -> Result<BTreeMap<String, MappingSetTable>> {
    split_by_prefix_with_config(table, &MappingSetConfig::default())
}

pub fn split_by_prefix_with_config(
    table: &MappingSetTable,
    config: &MappingSetConfig,
) -> Result<BTreeMap<String, MappingSetTable>> {
    split_by_prefix_selected(table, &SplitSelection::default(), config)
}

/// One derived table per (subject prefix, predicate, object prefix) that has
/// rows, each with its prefix map pruned to the prefixes its rows use plus
/// built-ins.
///
/// Combinations whose subject or object prefix is not in the table's prefix
/// map are skipped with a warning, as are rows whose subject or object is
/// not a CURIE. Combinations that lower-case to the same name (`MONDO` and
/// `mondo`, or `skos:exactMatch` and `ex:exactMatch`) share one split.
pub fn split_by_prefix_selected(
    table: &MappingSetTable,
    selection: &SplitSelection,
    config: &MappingSetConfig,
) -> Result<BTreeMap<String, MappingSetTable>> {
    let mut groups: BTreeMap<(String, String, String), Vec<Mapping>> = BTreeMap::new();
    let mut unprefixed = 0usize;
    for row in table.rows() {
        match (prefix_of(&row.subject_id), prefix_of(&row.object_id)) {
            (Some(sp), Some(op)) => {
                if selection.admits(sp, &row.predicate_id, op) {
                    groups
                        .entry((sp.to_string(), row.predicate_id.clone(), op.to_string()))
                        .or_default()
                        .push(row.clone());
                }
            }
            _ => unprefixed += 1,
        }
    }
    if unprefixed > 0 {
        tracing::warn!(
            rows = unprefixed,
            "rows without prefixed subject and object are not split"
        );
    }

    let mut named: BTreeMap<String, (Vec<Mapping>, BTreeSet<String>)> = BTreeMap::new();
    for ((subject_prefix, predicate, object_prefix), rows) in groups {
        let name = split_name(&subject_prefix, &predicate, &object_prefix);
        if !table.prefix_map().contains_prefix(&subject_prefix) {
            tracing::warn!(
                split = %name,
                prefix = %subject_prefix,
                "missing subject prefix; skipping split"
            );
            continue;
        }
        if !table.prefix_map().contains_prefix(&object_prefix) {
            tracing::warn!(
                split = %name,
                prefix = %object_prefix,
                "missing object prefix; skipping split"
            );
            continue;
        }

        let (split_rows, used) = named.entry(name).or_default();
        if !split_rows.is_empty() {
            tracing::debug!(
                %predicate,
                subject_prefix = %subject_prefix,
                object_prefix = %object_prefix,
                "split name already taken; merging rows"
            );
        }
        split_rows.extend(rows);
        used.insert(subject_prefix);
        used.insert(object_prefix);
        if let Some(prefix) = prefix_of(predicate.trim_start_matches('!')) {
            used.insert(prefix.to_string());
        }
    }

    let mut splits = BTreeMap::new();
    for (name, (rows, used)) in named {
        let prefix_map = prune_to_used(table.prefix_map(), &used, config.strict_prefix_cleaning)?;
        let mut split = table.derive(rows);
        split.prefix_map = prefix_map;
        splits.insert(name, split);
    }
    tracing::debug!(splits = splits.len(), "split mapping set by prefix");
    Ok(splits)
}

impl MappingSetTable {
    pub fn split_by_prefix(&self) -> Result<BTreeMap<String, MappingSetTable>> {
        split_by_prefix(self)
    }
}
