//! Resolving predicate lists given on a command line or in files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sssom_context::{expand_or_passthrough, PrefixMap};

/// Expand every entry to a full IRI.
///
/// An entry naming an existing file is read as newline-delimited CURIEs (blank
/// lines and `#` comments skipped); any other entry is a CURIE itself.
/// Unresolvable identifiers are passed through with a warning. Duplicates
/// are kept, in input order.
pub fn extract_iris<I, S>(entries: I, prefix_map: &PrefixMap) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iris = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim();
        let path = Path::new(entry);
        if path.is_file() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read predicate list {}", path.display()))?;
            iris.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(|curie| expand_or_passthrough(curie, prefix_map)),
            );
        } else if !entry.is_empty() {
            iris.push(expand_or_passthrough(entry, prefix_map));
        }
    }
    Ok(iris)
}
