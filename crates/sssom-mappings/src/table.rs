//! The in-memory mapping set: rows, bound prefix map and set-level metadata.
//!
//! The prefix map and the rows are kept jointly consistent: construction
//! reconciles the prefix map with the built-in prefixes and validates every
//! row's identifiers, and the only operation that changes the prefix map
//! ([`MappingSetTable::clean_prefix_map`]) is explicit and atomic.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use sssom_context::curie::is_absolute_uri;
use sssom_context::{
    contract, default_extended_prefix_map, expand, is_curie, prefix_of, prune_to_used, reconcile,
    PrefixMap,
};

use crate::config::MappingSetConfig;
use crate::error::{MappingSetError, Result};
use crate::mapping::{
    Mapping, Record, RowKey, SlotValue, OBJECT_ID, PREDICATE_ID, REQUIRED_FIELDS, SUBJECT_ID,
};
use crate::schema::MappingSchema;

/// Set-level metadata (`mapping_set_id`, `license`, `creator_id`, ...).
pub type Metadata = BTreeMap<String, SlotValue>;

#[derive(Debug, Clone)]
pub struct MappingSetTable {
    pub(crate) rows: Vec<Mapping>,
    pub(crate) prefix_map: PrefixMap,
    pub(crate) metadata: Metadata,
    pub(crate) schema: Arc<MappingSchema>,
    pub(crate) identifier_columns: BTreeSet<String>,
}

impl MappingSetTable {
    /// Build a table against the SSSOM schema and default configuration.
    pub fn new(
        rows: Vec<Mapping>,
        prefix_map: Option<&PrefixMap>,
        metadata: Option<Metadata>,
    ) -> Result<Self> {
        Self::with_schema(
            rows,
            prefix_map,
            metadata,
            Arc::new(MappingSchema::sssom()),
            &MappingSetConfig::default(),
        )
    }

    pub fn with_schema(
        mut rows: Vec<Mapping>,
        prefix_map: Option<&PrefixMap>,
        metadata: Option<Metadata>,
        schema: Arc<MappingSchema>,
        config: &MappingSetConfig,
    ) -> Result<Self> {
        let prefix_map = reconcile(prefix_map);
        prefix_map.validate()?;

        let identifier_columns = configured_identifier_columns(&schema, config)?;

        let mut unknown_slots: BTreeMap<String, usize> = BTreeMap::new();
        for (index, row) in rows.iter_mut().enumerate() {
            validate_identifiers(index, row)?;
            row.slots.retain(|name, _| {
                let known = schema.is_known(name);
                if !known {
                    *unknown_slots.entry(name.clone()).or_default() += 1;
                }
                known
            });
        }
        for (slot, count) in &unknown_slots {
            tracing::warn!(
                slot = %slot,
                rows = count,
                "dropping slot unknown to the mapping schema"
            );
        }

        let table = Self {
            rows,
            prefix_map,
            metadata: metadata.unwrap_or_default(),
            schema,
            identifier_columns,
        };
        table.warn_unresolved_prefixes();
        Ok(table)
    }

    /// Build a table from reader records.
    pub fn from_records(
        records: &[Record],
        prefix_map: Option<&PrefixMap>,
        metadata: Option<Metadata>,
        schema: Arc<MappingSchema>,
        config: &MappingSetConfig,
    ) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let required = |field: &'static str| -> Result<String> {
                record
                    .get(field)
                    .and_then(|v| v.as_str())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .ok_or(MappingSetError::MissingField { row: index, field })
            };
            let mut mapping = Mapping::new(
                required(SUBJECT_ID)?,
                required(PREDICATE_ID)?,
                required(OBJECT_ID)?,
            );
            for (name, value) in record {
                if REQUIRED_FIELDS.contains(&name.as_str()) {
                    continue;
                }
                if let Some(value) = SlotValue::from_json(value, schema.is_multivalued(name)) {
                    mapping.slots.insert(name.clone(), value);
                }
            }
            rows.push(mapping);
        }
        Self::with_schema(rows, prefix_map, metadata, schema, config)
    }

    /// A table with the given rows and this table's prefix map, metadata and schema.
    ///
    /// The prefix map is carried over as is, even when `rows` no longer uses
    /// some of it; call [`clean_prefix_map`](Self::clean_prefix_map) to minimise.
    pub fn derive(&self, rows: Vec<Mapping>) -> Self {
        Self {
            rows,
            prefix_map: self.prefix_map.clone(),
            metadata: self.metadata.clone(),
            schema: Arc::clone(&self.schema),
            identifier_columns: self.identifier_columns.clone(),
        }
    }

    pub fn rows(&self) -> &[Mapping] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn prefix_map(&self) -> &PrefixMap {
        &self.prefix_map
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn schema(&self) -> &MappingSchema {
        &self.schema
    }

    pub fn identifier_columns(&self) -> &BTreeSet<String> {
        &self.identifier_columns
    }

    pub fn records(&self) -> Vec<Record> {
        self.rows.iter().map(Mapping::to_record).collect()
    }

    pub fn into_parts(self) -> (Vec<Mapping>, PrefixMap, Metadata) {
        (self.rows, self.prefix_map, self.metadata)
    }

    pub fn expand(&self, id: &str) -> Option<String> {
        expand(id, &self.prefix_map)
    }

    pub fn contract(&self, uri: &str) -> String {
        contract(uri, &self.prefix_map)
    }

    /// Prefixes referenced by this table's identifier columns.
    pub fn used_prefixes(&self) -> BTreeSet<String> {
        used_prefixes(&self.rows, &self.identifier_columns)
    }

    /// Prune the bound prefix map to the prefixes the rows use (built-ins stay).
    ///
    /// With `strict`, a used prefix missing from the map fails the call and
    /// nothing is changed.
    pub fn clean_prefix_map(&mut self, strict: bool) -> Result<()> {
        let used = self.used_prefixes();
        let pruned = prune_to_used(&self.prefix_map, &used, strict)?;
        tracing::debug!(
            before = self.prefix_map.len(),
            after = pruned.len(),
            "pruned prefix map to prefixes in use"
        );
        self.prefix_map = pruned;
        Ok(())
    }

    /// Remove every row identical (all fields) to a row of `other`.
    pub fn remove_mappings(&mut self, other: &MappingSetTable) {
        if other.is_empty() {
            return;
        }
        let remove: HashSet<RowKey> = other.rows.iter().map(Mapping::row_key).collect();
        let before = self.rows.len();
        self.rows.retain(|row| !remove.contains(&row.row_key()));
        tracing::debug!(removed = before - self.rows.len(), "removed mappings");
    }

    fn warn_unresolved_prefixes(&self) {
        let unresolved: Vec<String> = self
            .used_prefixes()
            .into_iter()
            .filter(|prefix| !self.prefix_map.contains_prefix(prefix))
            .collect();
        if !unresolved.is_empty() {
            tracing::warn!(
                prefixes = %unresolved.join(", "),
                "identifiers use prefixes that are not in the prefix map"
            );
        }
    }
}

/// Prefix components referenced in `columns` across `rows`.
///
/// Absolute URIs and unprefixed values contribute nothing; a negated
/// predicate (`!prefix:local`) counts for its prefix.
pub fn used_prefixes(rows: &[Mapping], columns: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for row in rows {
        for column in columns {
            for value in row.field_values(column) {
                if let Some(prefix) = prefix_of(value.trim_start_matches('!')) {
                    out.insert(prefix.to_string());
                }
            }
        }
    }
    out
}

/// Prefix map and metadata for a mapping set that brings no header of its own.
pub fn default_metadata() -> (PrefixMap, Metadata) {
    (default_extended_prefix_map(), Metadata::new())
}

/// The required identifiers plus `config.identifier_columns`, each of which
/// must be an identifier slot of `schema`.
pub(crate) fn configured_identifier_columns(
    schema: &MappingSchema,
    config: &MappingSetConfig,
) -> Result<BTreeSet<String>> {
    let mut columns: BTreeSet<String> = REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect();
    for column in &config.identifier_columns {
        if !schema.is_identifier(column) {
            return Err(MappingSetError::InvalidArgument(format!(
                "identifier column `{column}` is not an identifier slot of the mapping schema"
            )));
        }
        columns.insert(column.clone());
    }
    Ok(columns)
}

fn validate_identifiers(index: usize, row: &Mapping) -> Result<()> {
    let fields = [
        (SUBJECT_ID, row.subject_id.as_str()),
        // Negated predicates are written `!prefix:local`.
        (PREDICATE_ID, row.predicate_id.trim_start_matches('!')),
        (OBJECT_ID, row.object_id.as_str()),
    ];
    for (field, value) in fields {
        if !(is_curie(value) || is_absolute_uri(value)) {
            return Err(MappingSetError::InvalidIdentifier {
                row: index,
                field,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}
