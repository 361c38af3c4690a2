//! Pushing set-level values down into mapping rows.

use std::collections::BTreeMap;

use crate::error::{MappingSetError, Result};
use crate::mapping::{Mapping, SlotValue, MULTIVALUE_SEPARATOR, REQUIRED_FIELDS};
use crate::table::MappingSetTable;

/// Set each overridden slot on every row to the `|`-joined distinct values,
/// the row's own values first, then the override values, in encounter order.
///
/// The required identifier fields cannot be overridden.
pub fn inject_metadata(
    rows: &[Mapping],
    overrides: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<Mapping>> {
    if let Some(field) = overrides
        .keys()
        .find(|field| REQUIRED_FIELDS.contains(&field.as_str()))
    {
        return Err(MappingSetError::InvalidArgument(format!(
            "`{field}` is a required identifier and cannot be injected"
        )));
    }

    Ok(rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            for (slot, values) in overrides {
                let mut merged: Vec<String> = Vec::new();
                for value in row.field_values(slot).into_iter().chain(values.iter().cloned()) {
                    if !value.is_empty() && !merged.contains(&value) {
                        merged.push(value);
                    }
                }
                if !merged.is_empty() {
                    let joined = merged.join(&MULTIVALUE_SEPARATOR.to_string());
                    row.set(slot, SlotValue::Text(joined));
                }
            }
            row
        })
        .collect())
}

impl MappingSetTable {
    /// Rows with the table's mapping-level metadata filled in wherever a row
    /// does not carry the slot itself.
    pub fn inject_own_metadata(&self) -> Vec<Mapping> {
        let inherited: Vec<(&String, &SlotValue)> = self
            .metadata
            .iter()
            .filter(|(slot, _)| {
                !REQUIRED_FIELDS.contains(&slot.as_str()) && self.schema.is_known(slot)
            })
            .collect();
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                for (slot, value) in &inherited {
                    row.slots
                        .entry((*slot).clone())
                        .or_insert_with(|| (*value).clone());
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{CREATOR_ID, SUBJECT_ID};
    use crate::table::Metadata;

    fn overrides(slot: &str, values: &[&str]) -> BTreeMap<String, Vec<String>> {
        let mut map = BTreeMap::new();
        map.insert(slot.to_string(), values.iter().map(|v| v.to_string()).collect());
        map
    }

    #[test]
    fn values_are_joined_in_encounter_order_without_duplicates() {
        let rows = vec![
            Mapping::new("a:1", "skos:exactMatch", "b:1")
                .with_slot(CREATOR_ID, vec!["orcid:2".to_string(), "orcid:1".to_string()]),
            Mapping::new("a:2", "skos:exactMatch", "b:2"),
        ];
        let out = inject_metadata(&rows, &overrides(CREATOR_ID, &["orcid:1", "orcid:3"])).unwrap();
        assert_eq!(out[0].get_text(CREATOR_ID), Some("orcid:2|orcid:1|orcid:3"));
        assert_eq!(out[1].get_text(CREATOR_ID), Some("orcid:1|orcid:3"));
        // Input rows are untouched.
        assert!(matches!(rows[0].slots[CREATOR_ID], SlotValue::List(_)));
    }

    #[test]
    fn required_fields_cannot_be_injected() {
        let rows = vec![Mapping::new("a:1", "skos:exactMatch", "b:1")];
        let err = inject_metadata(&rows, &overrides(SUBJECT_ID, &["a:9"])).unwrap_err();
        assert!(matches!(err, MappingSetError::InvalidArgument(_)));
    }

    #[test]
    fn own_metadata_fills_missing_mapping_slots_only() {
        let mut metadata = Metadata::new();
        metadata.insert("license".to_string(), SlotValue::from("https://example.org/license"));
        metadata.insert("mapping_set_id".to_string(), SlotValue::from("https://example.org/set"));
        let rows = vec![
            Mapping::new("a:1", "skos:exactMatch", "b:1"),
            Mapping::new("a:2", "skos:exactMatch", "b:2")
                .with_slot("license", "https://other.org/l"),
        ];
        let table = MappingSetTable::new(rows, None, Some(metadata)).unwrap();
        let injected = table.inject_own_metadata();
        assert_eq!(injected[0].get_text("license"), Some("https://example.org/license"));
        assert_eq!(injected[1].get_text("license"), Some("https://other.org/l"));
        assert!(!injected[0].slots.contains_key("mapping_set_id"));
    }
}
