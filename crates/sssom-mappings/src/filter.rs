//! Prefix-based row selection.

use std::collections::BTreeSet;

use sssom_context::prefix_of;

use crate::error::{MappingSetError, Result};
use crate::mapping::{Mapping, OBJECT_ID, PREDICATE_ID, SUBJECT_ID};
use crate::table::MappingSetTable;

pub const NO_MATCH_PREDICATE: &str = "noMatch";
pub const NO_TERM_FOUND: &str = "sssom:NoTermFound";

// ============================================================================
// Row-level
// ============================================================================

/// Keep rows where any (`require_all = false`) or every (`true`) listed
/// column has a prefix in `prefixes`.
pub fn filter_prefixes(
    rows: &[Mapping],
    prefixes: &[&str],
    columns: &[&str],
    require_all: bool,
) -> Result<Vec<Mapping>> {
    let wanted = prefix_set(prefixes, columns)?;
    Ok(rows
        .iter()
        .filter(|row| row_matches(row, &wanted, columns, require_all))
        .cloned()
        .collect())
}

/// Drop rows where any (`require_all = false`) or every (`true`) listed
/// column has a prefix in `prefixes`.
///
/// With `require_all = false` this is the complement of
/// [`filter_prefixes`] with `require_all = false`.
pub fn filter_out_prefixes(
    rows: &[Mapping],
    prefixes: &[&str],
    columns: &[&str],
    require_all: bool,
) -> Result<Vec<Mapping>> {
    let unwanted = prefix_set(prefixes, columns)?;
    Ok(rows
        .iter()
        .filter(|row| !row_matches(row, &unwanted, columns, require_all))
        .cloned()
        .collect())
}

/// Drop rows that record the absence of a match.
pub fn remove_unmatched(rows: &[Mapping]) -> Vec<Mapping> {
    rows.iter()
        .filter(|row| !is_unmatched(row))
        .cloned()
        .collect()
}

fn is_unmatched(row: &Mapping) -> bool {
    let predicate_local = row
        .predicate_id
        .rsplit([':', '/', '#'])
        .next()
        .unwrap_or(&row.predicate_id);
    predicate_local == NO_MATCH_PREDICATE || row.object_id == NO_TERM_FOUND
}

fn prefix_set<'a>(prefixes: &[&'a str], columns: &[&str]) -> Result<BTreeSet<&'a str>> {
    if prefixes.is_empty() {
        return Err(MappingSetError::InvalidArgument(
            "at least one prefix is required".to_string(),
        ));
    }
    if columns.is_empty() {
        return Err(MappingSetError::InvalidArgument(
            "at least one column is required".to_string(),
        ));
    }
    Ok(prefixes.iter().copied().collect())
}

fn column_matches(row: &Mapping, column: &str, prefixes: &BTreeSet<&str>) -> bool {
    row.field_values(column).iter().any(|value| {
        let value = if column == PREDICATE_ID {
            value.trim_start_matches('!')
        } else {
            value.as_str()
        };
        prefix_of(value).is_some_and(|prefix| prefixes.contains(prefix))
    })
}

fn row_matches(
    row: &Mapping,
    prefixes: &BTreeSet<&str>,
    columns: &[&str],
    require_all: bool,
) -> bool {
    if require_all {
        columns.iter().all(|c| column_matches(row, c, prefixes))
    } else {
        columns.iter().any(|c| column_matches(row, c, prefixes))
    }
}

// ============================================================================
// Table-level
// ============================================================================

/// The columns prefix filters look at when the caller names none.
pub const DEFAULT_FILTER_COLUMNS: [&str; 2] = [SUBJECT_ID, OBJECT_ID];

impl MappingSetTable {
    fn check_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| !self.schema.is_known(c)) {
            Some(unknown) => Err(MappingSetError::InvalidArgument(format!(
                "unknown column `{unknown}`"
            ))),
            None => Ok(()),
        }
    }

    /// A new table holding the rows [`filter_prefixes`] keeps. The prefix
    /// map is carried over unchanged.
    pub fn filter_prefixes(
        &self,
        prefixes: &[&str],
        columns: &[&str],
        require_all: bool,
    ) -> Result<MappingSetTable> {
        self.check_columns(columns)?;
        let rows = filter_prefixes(&self.rows, prefixes, columns, require_all)?;
        tracing::debug!(kept = rows.len(), of = self.rows.len(), "filtered by prefix");
        Ok(self.derive(rows))
    }

    pub fn filter_out_prefixes(
        &self,
        prefixes: &[&str],
        columns: &[&str],
        require_all: bool,
    ) -> Result<MappingSetTable> {
        self.check_columns(columns)?;
        let rows = filter_out_prefixes(&self.rows, prefixes, columns, require_all)?;
        tracing::debug!(kept = rows.len(), of = self.rows.len(), "filtered out by prefix");
        Ok(self.derive(rows))
    }

    pub fn remove_unmatched(&self) -> MappingSetTable {
        self.derive(remove_unmatched(&self.rows))
    }
}
