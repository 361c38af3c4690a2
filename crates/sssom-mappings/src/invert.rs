//! Mapping inversion: swap subject and object, replace the predicate by its inverse.

use std::collections::{BTreeMap, HashSet};

use sssom_context::prefix_of;

use crate::config::MappingSetConfig;
use crate::mapping::{Mapping, RowKey, SlotValue};
use crate::table::MappingSetTable;

const MAPPING_CARDINALITY: &str = "mapping_cardinality";
const PREDICATE_LABEL: &str = "predicate_label";

/// Predicate → inverse predicate. Self-inverse predicates map to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InversePredicates(BTreeMap<String, String>);

impl Default for InversePredicates {
    fn default() -> Self {
        Self::sssom()
    }
}

impl InversePredicates {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// The SKOS, OWL, RDFS and oboInOwl predicates SSSOM mapping sets use.
    pub fn sssom() -> Self {
        let mut table = Self::empty();
        table.insert("skos:broadMatch", "skos:narrowMatch");
        table.insert("skos:exactMatch", "skos:exactMatch");
        table.insert("skos:closeMatch", "skos:closeMatch");
        table.insert("skos:relatedMatch", "skos:relatedMatch");
        table.insert("owl:equivalentClass", "owl:equivalentClass");
        table.insert("owl:equivalentProperty", "owl:equivalentProperty");
        table.insert("owl:sameAs", "owl:sameAs");
        table.insert("owl:differentFrom", "owl:differentFrom");
        table.insert("rdfs:subClassOf", "sssom:superClassOf");
        table.insert("rdfs:subPropertyOf", "sssom:superPropertyOf");
        table.insert("oboInOwl:hasDbXref", "oboInOwl:hasDbXref");
        table
    }

    /// The SSSOM table with the configured `inverse_predicates` applied.
    pub fn from_config(config: &MappingSetConfig) -> Self {
        Self::sssom().with_overrides(&config.inverse_predicates)
    }

    /// Apply `overrides` on top of this table (each pair registered both ways).
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (predicate, inverse) in overrides {
            self.insert(predicate.clone(), inverse.clone());
        }
        self
    }

    /// Register `predicate` and `inverse` as inverses of each other.
    ///
    /// Former partners of either predicate lose their inverse.
    pub fn insert(&mut self, predicate: impl Into<String>, inverse: impl Into<String>) {
        let predicate = predicate.into();
        let inverse = inverse.into();
        self.unlink(&predicate, &inverse);
        self.unlink(&inverse, &predicate);
        self.0.insert(inverse.clone(), predicate.clone());
        self.0.insert(predicate, inverse);
    }

    /// Drop the reverse entry of `predicate`'s current partner unless that
    /// partner is `keep`.
    fn unlink(&mut self, predicate: &str, keep: &str) {
        let Some(partner) = self.0.get(predicate).cloned() else {
            return;
        };
        if partner != keep && self.0.get(&partner).map(String::as_str) == Some(predicate) {
            self.0.remove(&partner);
        }
    }

    /// The inverse of `predicate`; a negated predicate inverts to the
    /// negated inverse.
    pub fn inverse_of(&self, predicate: &str) -> Option<String> {
        match predicate.strip_prefix('!') {
            Some(positive) => self.0.get(positive).map(|inverse| format!("!{inverse}")),
            None => self.0.get(predicate).cloned(),
        }
    }

    /// True when inverting twice gives back every registered predicate.
    pub fn is_symmetric(&self) -> bool {
        self.0
            .iter()
            .all(|(predicate, inverse)| self.0.get(inverse) == Some(predicate))
    }
}

/// Companion slot name on the other side of the mapping, if any.
fn swapped_slot_name(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("subject_") {
        Some(format!("object_{rest}"))
    } else {
        name.strip_prefix("object_").map(|rest| format!("subject_{rest}"))
    }
}

fn invert_cardinality(value: &SlotValue) -> SlotValue {
    match value.as_text() {
        Some(text) => match text.split_once(':') {
            Some((left, right)) => SlotValue::Text(format!("{right}:{left}")),
            None => value.clone(),
        },
        None => value.clone(),
    }
}

/// Invert one row, or `None` when its predicate has no registered inverse.
///
/// `subject_*`/`object_*` slots trade places and `mapping_cardinality` is
/// flipped. When the inverse differs from the original predicate the
/// `predicate_label` slot is dropped; a second inversion does not bring it
/// back.
pub fn invert_mapping(row: &Mapping, inverses: &InversePredicates) -> Option<Mapping> {
    let inverse = inverses.inverse_of(&row.predicate_id)?;
    let mut slots = BTreeMap::new();
    for (name, value) in &row.slots {
        match (swapped_slot_name(name), name.as_str()) {
            (Some(swapped), _) => {
                slots.insert(swapped, value.clone());
            }
            (None, MAPPING_CARDINALITY) => {
                slots.insert(name.clone(), invert_cardinality(value));
            }
            (None, PREDICATE_LABEL) if inverse != row.predicate_id => {}
            (None, _) => {
                slots.insert(name.clone(), value.clone());
            }
        }
    }
    Some(Mapping {
        subject_id: row.object_id.clone(),
        predicate_id: inverse,
        object_id: row.subject_id.clone(),
        slots,
    })
}

/// Invert `rows`.
///
/// With `subject_prefix`, only rows whose subject carries that prefix take
/// part; the rest are dropped. Rows whose predicate has no inverse are
/// dropped with a warning. With `merge_inverted`, the participating original
/// rows come first, followed by the inverted rows, without full-row duplicates.
pub fn invert_mappings(
    rows: &[Mapping],
    subject_prefix: Option<&str>,
    merge_inverted: bool,
    inverses: &InversePredicates,
) -> Vec<Mapping> {
    let selected: Vec<&Mapping> = rows
        .iter()
        .filter(|row| match subject_prefix {
            Some(wanted) => prefix_of(&row.subject_id) == Some(wanted),
            None => true,
        })
        .collect();

    let mut non_invertible: BTreeMap<&str, usize> = BTreeMap::new();
    let mut inverted = Vec::with_capacity(selected.len());
    for row in &selected {
        match invert_mapping(row, inverses) {
            Some(mapping) => inverted.push(mapping),
            None => *non_invertible.entry(row.predicate_id.as_str()).or_default() += 1,
        }
    }
    for (predicate, count) in &non_invertible {
        tracing::warn!(
            predicate = %predicate,
            rows = count,
            "predicate has no known inverse; dropping rows from the inversion"
        );
    }

    if !merge_inverted {
        return inverted;
    }
    let mut seen: HashSet<RowKey> = HashSet::new();
    selected
        .into_iter()
        .cloned()
        .chain(inverted)
        .filter(|row| seen.insert(row.row_key()))
        .collect()
}

impl MappingSetTable {
    /// A new table of inverted rows; see [`invert_mappings`].
    pub fn invert_mappings(
        &self,
        subject_prefix: Option<&str>,
        merge_inverted: bool,
        inverses: &InversePredicates,
    ) -> MappingSetTable {
        self.derive(invert_mappings(&self.rows, subject_prefix, merge_inverted, inverses))
    }

    /// [`MappingSetTable::invert_mappings`] with the inverse table built from
    /// `config`.
    pub fn invert_mappings_with_config(
        &self,
        subject_prefix: Option<&str>,
        merge_inverted: bool,
        config: &MappingSetConfig,
    ) -> MappingSetTable {
        let inverses = InversePredicates::from_config(config);
        self.invert_mappings(subject_prefix, merge_inverted, &inverses)
    }
}
