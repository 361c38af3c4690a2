//! Slot schema for mapping rows.
//!
//! The schema is supplied when a table is built, so rows are validated once
//! at the boundary rather than interpreted field by field later on.

use std::collections::BTreeSet;

use sssom_context::context::sssom_context;

use crate::mapping::REQUIRED_FIELDS;

/// Optional slots of an SSSOM mapping (schema 0.15), plus the legacy `match_type`.
const SSSOM_MAPPING_SLOTS: &[&str] = &[
    "subject_label",
    "subject_category",
    "subject_type",
    "subject_source",
    "subject_source_version",
    "subject_match_field",
    "subject_preprocessing",
    "predicate_label",
    "predicate_modifier",
    "object_label",
    "object_category",
    "object_type",
    "object_source",
    "object_source_version",
    "object_match_field",
    "object_preprocessing",
    "mapping_justification",
    "author_id",
    "author_label",
    "reviewer_id",
    "reviewer_label",
    "creator_id",
    "creator_label",
    "license",
    "mapping_provider",
    "mapping_source",
    "mapping_cardinality",
    "mapping_tool",
    "mapping_tool_version",
    "mapping_date",
    "publication_date",
    "confidence",
    "curation_rule",
    "curation_rule_text",
    "match_string",
    "similarity_score",
    "similarity_measure",
    "see_also",
    "issue_tracker_item",
    "other",
    "comment",
    "match_type",
];

const SSSOM_MULTIVALUED_SLOTS: &[&str] = &[
    "author_id",
    "author_label",
    "reviewer_id",
    "reviewer_label",
    "creator_id",
    "creator_label",
    "subject_match_field",
    "object_match_field",
    "subject_preprocessing",
    "object_preprocessing",
    "match_string",
    "curation_rule",
    "curation_rule_text",
    "see_also",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSchema {
    slots: BTreeSet<String>,
    identifier_slots: BTreeSet<String>,
    multivalued_slots: BTreeSet<String>,
    /// Accept slots that are not declared.
    open: bool,
}

impl MappingSchema {
    /// The SSSOM mapping schema. Identifier-bearing slots are taken from the
    /// `"@type": "@id"` terms of the built-in JSON-LD context.
    pub fn sssom() -> Self {
        let slots: BTreeSet<String> = SSSOM_MAPPING_SLOTS.iter().map(|s| s.to_string()).collect();
        let identifier_slots = sssom_context()
            .identifier_slots
            .iter()
            .filter(|s| slots.contains(*s) || REQUIRED_FIELDS.contains(&s.as_str()))
            .cloned()
            .collect();
        Self {
            slots,
            identifier_slots,
            multivalued_slots: SSSOM_MULTIVALUED_SLOTS.iter().map(|s| s.to_string()).collect(),
            open: false,
        }
    }

    /// A schema that accepts any slot as single-valued text.
    pub fn open() -> Self {
        Self {
            open: true,
            identifier_slots: REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>) -> Self {
        self.slots.insert(name.into());
        self
    }

    pub fn with_multivalued_slot(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(name.clone());
        self.multivalued_slots.insert(name);
        self
    }

    pub fn with_identifier_slot(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(name.clone());
        self.identifier_slots.insert(name);
        self
    }

    pub fn is_known(&self, slot: &str) -> bool {
        self.open || REQUIRED_FIELDS.contains(&slot) || self.slots.contains(slot)
    }

    pub fn is_identifier(&self, slot: &str) -> bool {
        REQUIRED_FIELDS.contains(&slot) || self.identifier_slots.contains(slot)
    }

    pub fn is_multivalued(&self, slot: &str) -> bool {
        self.multivalued_slots.contains(slot)
    }
}
