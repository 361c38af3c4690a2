//! Predicate-agnostic comparison of two mapping sets.
//!
//! Rows are compared by the unordered pair of entities they connect, so
//! `A owl:equivalentClass B` in one set and `B skos:closeMatch A` in the other
//! count as a mapping in common.

use std::collections::{BTreeMap, BTreeSet};

use sssom_context::{expand, PrefixMap};

use crate::mapping::{Mapping, SlotValue, COMMENT};
use crate::table::MappingSetTable;

/// Unordered pair of entity identifiers, compared on expanded URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityPair {
    first: String,
    second: String,
}

impl EntityPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Pair for `row`, expanding CURIEs with `prefix_map` where possible.
    pub fn of_row(row: &Mapping, prefix_map: &PrefixMap) -> Self {
        let resolve = |id: &str| expand(id, prefix_map).unwrap_or_else(|| id.to_string());
        Self::new(resolve(&row.subject_id), resolve(&row.object_id))
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Where a pair was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffSide {
    UniqueToLeft,
    UniqueToRight,
    Common,
}

impl DiffSide {
    /// The annotation written into the `comment` slot of combined rows.
    pub fn comment(self) -> &'static str {
        match self {
            DiffSide::UniqueToLeft => "UNIQUE_1",
            DiffSide::UniqueToRight => "UNIQUE_2",
            DiffSide::Common => "COMMON_TO_BOTH",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffRow {
    pub side: DiffSide,
    pub pair: EntityPair,
    pub mapping: Mapping,
}

#[derive(Debug, Clone, Default)]
pub struct MappingSetDiff {
    pub unique_left: BTreeSet<EntityPair>,
    pub unique_right: BTreeSet<EntityPair>,
    pub common: BTreeSet<EntityPair>,
    /// Left-only rows, then right-only rows, then common rows (left before
    /// right within a pair), pairs in sorted order.
    pub combined: Vec<DiffRow>,
}

impl MappingSetDiff {
    /// Combined rows with the side annotation stored in `comment`.
    pub fn combined_rows_with_comment(&self) -> Vec<Mapping> {
        self.combined
            .iter()
            .map(|row| {
                let mut mapping = row.mapping.clone();
                mapping.set(COMMENT, SlotValue::from(row.side.comment()));
                mapping
            })
            .collect()
    }
}

/// Group rows by entity pair, keeping row order within each group.
pub fn group_by_entity_pair(
    rows: &[Mapping],
    prefix_map: &PrefixMap,
) -> BTreeMap<EntityPair, Vec<Mapping>> {
    let mut groups: BTreeMap<EntityPair, Vec<Mapping>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(EntityPair::of_row(row, prefix_map))
            .or_default()
            .push(row.clone());
    }
    groups
}

pub fn compare(left: &MappingSetTable, right: &MappingSetTable) -> MappingSetDiff {
    let mut left_groups = group_by_entity_pair(left.rows(), left.prefix_map());
    let mut right_groups = group_by_entity_pair(right.rows(), right.prefix_map());

    let left_pairs: BTreeSet<EntityPair> = left_groups.keys().cloned().collect();
    let right_pairs: BTreeSet<EntityPair> = right_groups.keys().cloned().collect();

    let mut diff = MappingSetDiff {
        unique_left: left_pairs.difference(&right_pairs).cloned().collect(),
        unique_right: right_pairs.difference(&left_pairs).cloned().collect(),
        common: left_pairs.intersection(&right_pairs).cloned().collect(),
        combined: Vec::new(),
    };

    let mut combined = Vec::new();
    for pair in &diff.unique_left {
        let rows = left_groups.remove(pair).unwrap_or_default();
        combined.extend(diff_rows(DiffSide::UniqueToLeft, pair, rows));
    }
    for pair in &diff.unique_right {
        let rows = right_groups.remove(pair).unwrap_or_default();
        combined.extend(diff_rows(DiffSide::UniqueToRight, pair, rows));
    }
    for pair in &diff.common {
        let mut rows = left_groups.remove(pair).unwrap_or_default();
        rows.extend(right_groups.remove(pair).unwrap_or_default());
        combined.extend(diff_rows(DiffSide::Common, pair, rows));
    }
    diff.combined = combined;

    tracing::debug!(
        unique_left = diff.unique_left.len(),
        unique_right = diff.unique_right.len(),
        common = diff.common.len(),
        "compared mapping sets"
    );
    diff
}

fn diff_rows(
    side: DiffSide,
    pair: &EntityPair,
    rows: Vec<Mapping>,
) -> impl Iterator<Item = DiffRow> + '_ {
    rows.into_iter().map(move |mapping| DiffRow {
        side,
        pair: pair.clone(),
        mapping,
    })
}
