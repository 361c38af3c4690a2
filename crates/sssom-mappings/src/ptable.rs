//! Collapsing duplicate triples and exporting probability tables.
//!
//! A probability table row gives, for one (subject, object) pair, the
//! probability of each of four relations: subject is a subclass of object,
//! a superclass, equivalent, or a disjoint sibling.

use std::collections::HashMap;

use crate::error::{MappingSetError, Result};
use crate::mapping::{Mapping, CONFIDENCE};
use crate::table::MappingSetTable;

pub const DEFAULT_INVERSE_FACTOR: f64 = 0.5;

// ============================================================================
// Predicate classes
// ============================================================================

/// The four relations a probability table distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateClass {
    SubClass,
    SuperClass,
    Equivalent,
    Sibling,
}

impl PredicateClass {
    /// Class of a (positive) predicate CURIE, or `None` when it has none.
    pub fn of(predicate: &str) -> Option<Self> {
        match predicate {
            "owl:equivalentClass" | "skos:exactMatch" | "skos:closeMatch" => {
                Some(Self::Equivalent)
            }
            "owl:subClassOf" | "rdfs:subClassOf" | "skos:broadMatch" => Some(Self::SubClass),
            "inverseOf(owl:subClassOf)" | "sssom:superClassOf" | "skos:narrowMatch" => {
                Some(Self::SuperClass)
            }
            "owl:differentFrom" | "dbpedia-owl:different" => Some(Self::Sibling),
            _ => None,
        }
    }

    /// Column of this class in a probability table row.
    pub fn index(self) -> usize {
        match self {
            Self::SubClass => 0,
            Self::SuperClass => 1,
            Self::Equivalent => 2,
            Self::Sibling => 3,
        }
    }
}

// ============================================================================
// Collapse
// ============================================================================

/// One row per (subject, predicate, object) carrying the highest confidence
/// of its group; other slots are dropped.
///
/// Rows keep the order in which their triple first appears. A group in which
/// no row has a confidence collapses to a row without one.
pub fn collapse(rows: &[Mapping]) -> Vec<Mapping> {
    let mut index: HashMap<(&str, &str, &str), usize> = HashMap::new();
    let mut collapsed: Vec<(Mapping, Option<f64>)> = Vec::new();
    for row in rows {
        let key = (
            row.subject_id.as_str(),
            row.predicate_id.as_str(),
            row.object_id.as_str(),
        );
        let confidence = row.confidence();
        match index.get(&key) {
            Some(&at) => {
                let best = &mut collapsed[at].1;
                if let Some(c) = confidence {
                    if best.map_or(true, |b| c > b) {
                        *best = Some(c);
                    }
                }
            }
            None => {
                index.insert(key, collapsed.len());
                let triple = Mapping::new(&row.subject_id, &row.predicate_id, &row.object_id);
                collapsed.push((triple, confidence));
            }
        }
    }
    collapsed
        .into_iter()
        .map(|(mapping, confidence)| match confidence {
            Some(c) => mapping.with_slot(CONFIDENCE, c),
            None => mapping,
        })
        .collect()
}

// ============================================================================
// Probability table
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PTableRow {
    pub subject_id: String,
    pub object_id: String,
    /// Indexed by [`PredicateClass::index`].
    pub probabilities: [f64; 4],
}

impl PTableRow {
    /// `subject, object, p0..p3` as text fields, for a tab-separated writer.
    pub fn fields(&self) -> Vec<String> {
        let mut out = vec![self.subject_id.clone(), self.object_id.clone()];
        out.extend(self.probabilities.iter().map(f64::to_string));
        out
    }
}

fn probabilities(class: PredicateClass, confidence: f64, inverse_factor: f64) -> [f64; 4] {
    let c = confidence;
    let inverse = (1.0 - c) * inverse_factor;
    let residual = (1.0 - (c + inverse)) / 2.0;
    match class {
        PredicateClass::SubClass => [c, inverse, residual, residual],
        PredicateClass::SuperClass => [inverse, c, residual, residual],
        PredicateClass::Equivalent => [residual, residual, c, inverse],
        PredicateClass::Sibling => [residual, residual, inverse, c],
    }
}

/// Collapse `rows`, then turn each into a probability table row.
///
/// `inverse_factor` is the share of the remaining mass (`1 - confidence`)
/// given to the inverse relation; the rest is split evenly between the
/// other two. Rows with an unclassified predicate or without a confidence
/// are skipped with a warning.
pub fn to_ptable(rows: &[Mapping], inverse_factor: f64) -> Result<Vec<PTableRow>> {
    if !(0.0..=1.0).contains(&inverse_factor) {
        return Err(MappingSetError::InvalidArgument(format!(
            "inverse factor must be in [0, 1], got {inverse_factor}"
        )));
    }

    let mut table = Vec::new();
    let mut unclassified = 0usize;
    let mut unscored = 0usize;
    for row in collapse(rows) {
        let Some(class) = PredicateClass::of(&row.predicate_id) else {
            tracing::warn!(predicate = %row.predicate_id, "unknown predicate; skipping row");
            unclassified += 1;
            continue;
        };
        let Some(confidence) = row.confidence() else {
            unscored += 1;
            continue;
        };
        if !(0.0..=1.0).contains(&confidence) {
            return Err(MappingSetError::InvalidArgument(format!(
                "confidence {confidence} of {} {} {} is outside [0, 1]",
                row.subject_id, row.predicate_id, row.object_id
            )));
        }
        table.push(PTableRow {
            subject_id: row.subject_id,
            object_id: row.object_id,
            probabilities: probabilities(class, confidence, inverse_factor),
        });
    }
    if unscored > 0 {
        tracing::warn!(
            rows = unscored,
            "rows without confidence left out of the probability table"
        );
    }
    tracing::debug!(
        rows = table.len(),
        unclassified,
        unscored,
        "built probability table"
    );
    Ok(table)
}

impl MappingSetTable {
    /// A table of [`collapse`]d rows.
    pub fn collapse(&self) -> MappingSetTable {
        self.derive(collapse(&self.rows))
    }

    pub fn to_ptable(&self, inverse_factor: f64) -> Result<Vec<PTableRow>> {
        to_ptable(&self.rows, inverse_factor)
    }
}
