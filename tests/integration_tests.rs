//! Integration tests for the complete mapping-set pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - reader records → table construction → prefix reconciliation
//! - filter → remove → clean → diff
//! - merge with reconciliation → split by prefix, cliques, probability table
//! - predicate lists from files and literals
//!
//! Run with: cargo test --test integration_tests

use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use sssom_context::{default_extended_prefix_map, PrefixMap, SSSOM_BUILT_IN_PREFIXES};
use sssom_mappings::{
    compare, extract_iris, inject_metadata, merge, split_by_prefix_selected, MappingSchema,
    MappingSetConfig, MappingSetTable, Metadata, Record, SlotValue, SplitSelection,
    DEFAULT_FILTER_COLUMNS, DEFAULT_INVERSE_FACTOR,
};

fn records(value: serde_json::Value) -> Vec<Record> {
    serde_json::from_value(value).expect("records are well-formed")
}

fn disease_prefixes() -> PrefixMap {
    [
        ("MONDO", "http://purl.obolibrary.org/obo/MONDO_"),
        ("DOID", "http://purl.obolibrary.org/obo/DOID_"),
        ("HP", "http://purl.obolibrary.org/obo/HP_"),
        ("orcid", "https://orcid.org/"),
        ("unused", "http://unused.example.org/"),
    ]
    .into_iter()
    .collect()
}

fn left_table() -> MappingSetTable {
    let rows = records(json!([
        {"subject_id": "MONDO:0000001", "predicate_id": "skos:exactMatch", "object_id": "DOID:4",
         "mapping_justification": "semapv:LexicalMatching", "confidence": 0.8,
         "creator_id": "orcid:0000-0001"},
        {"subject_id": "MONDO:0000002", "predicate_id": "skos:broadMatch",
         "object_id": "HP:0000118", "mapping_justification": "semapv:ManualMappingCuration",
         "confidence": 0.95},
        {"subject_id": "MONDO:0000003", "predicate_id": "skos:exactMatch", "object_id": "DOID:7",
         "confidence": 0.6}
    ]));
    let mut metadata = Metadata::new();
    metadata.insert(
        "mapping_set_id".to_string(),
        SlotValue::from("https://example.org/left.sssom.tsv"),
    );
    metadata.insert(
        "license".to_string(),
        SlotValue::from("https://creativecommons.org/licenses/by/4.0/"),
    );

    let config = MappingSetConfig {
        identifier_columns: vec!["creator_id".to_string()],
        ..Default::default()
    };
    MappingSetTable::from_records(
        &rows,
        Some(&disease_prefixes()),
        Some(metadata),
        Arc::new(MappingSchema::sssom()),
        &config,
    )
    .expect("left table")
}

fn right_table() -> MappingSetTable {
    let rows = records(json!([
        {"subject_id": "DOID:4", "predicate_id": "skos:closeMatch", "object_id": "MONDO:0000001",
         "confidence": 0.7},
        {"subject_id": "MONDO:0000003", "predicate_id": "!skos:exactMatch", "object_id": "DOID:7",
         "mapping_justification": "semapv:ManualMappingCuration", "confidence": 0.6},
        {"subject_id": "MONDO:0000009", "predicate_id": "skos:exactMatch", "object_id": "DOID:9",
         "confidence": 0.5}
    ]));
    MappingSetTable::from_records(
        &rows,
        Some(&disease_prefixes()),
        None,
        Arc::new(MappingSchema::sssom()),
        &MappingSetConfig::default(),
    )
    .expect("right table")
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_records_build_a_reconciled_table() {
    let table = left_table();
    assert_eq!(table.len(), 3);
    for prefix in SSSOM_BUILT_IN_PREFIXES {
        assert!(table.prefix_map().contains_prefix(prefix));
    }
    assert!(table.used_prefixes().contains("orcid"));
    assert_eq!(
        table.expand("MONDO:0000001").as_deref(),
        Some("http://purl.obolibrary.org/obo/MONDO_0000001")
    );
    assert_eq!(table.contract("http://purl.obolibrary.org/obo/HP_0000118"), "HP:0000118");
}

#[test]
fn test_extended_prefix_map_prefers_built_in_bindings() {
    let extended = default_extended_prefix_map();
    let built_in = sssom_context::built_in_prefix_map();
    for (prefix, namespace) in built_in.iter() {
        assert_eq!(extended.get(prefix), Some(namespace));
    }
    assert!(extended.len() > built_in.len());
}

// ============================================================================
// Filter → remove → clean
// ============================================================================

#[test]
fn test_filter_remove_and_clean() {
    let mut table = left_table();

    let doid = table
        .filter_prefixes(&["DOID"], &DEFAULT_FILTER_COLUMNS, false)
        .expect("filter");
    assert_eq!(doid.len(), 2);
    assert_eq!(doid.prefix_map(), table.prefix_map());

    table.remove_mappings(&doid);
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].object_id, "HP:0000118");

    table.clean_prefix_map(true).expect("every used prefix is bound");
    let prefixes = table.prefix_map().prefixes();
    assert!(prefixes.contains("MONDO"));
    assert!(prefixes.contains("HP"));
    assert!(!prefixes.contains("DOID"));
    assert!(!prefixes.contains("unused"));
}

// ============================================================================
// Diff
// ============================================================================

#[test]
fn test_diff_is_predicate_agnostic() {
    let diff = compare(&left_table(), &right_table());
    // MONDO:1/DOID:4 and MONDO:3/DOID:7 in both; MONDO:2/HP only left; MONDO:9/DOID:9 only right.
    assert_eq!(diff.common.len(), 2);
    assert_eq!(diff.unique_left.len(), 1);
    assert_eq!(diff.unique_right.len(), 1);
    assert_eq!(diff.combined.len(), 6);

    let annotated = diff.combined_rows_with_comment();
    assert!(annotated
        .iter()
        .all(|row| row.get_text("comment").is_some()));
}

// ============================================================================
// Merge → split
// ============================================================================

#[test]
fn test_merge_reconciles_negation_and_injects_metadata() {
    let merged = merge(&left_table(), &right_table(), true).expect("merge");

    let mondo3: Vec<_> = merged
        .rows()
        .iter()
        .filter(|row| row.subject_id == "MONDO:0000003")
        .collect();
    assert_eq!(mondo3.len(), 1);
    assert_eq!(mondo3[0].predicate_id, "!skos:exactMatch");

    let mondo2 = merged
        .rows()
        .iter()
        .find(|row| row.subject_id == "MONDO:0000002")
        .expect("left-only row survives");
    assert_eq!(
        mondo2.get_text("license"),
        Some("https://creativecommons.org/licenses/by/4.0/")
    );
    assert_eq!(
        merged.metadata().get("mapping_set_id"),
        Some(&SlotValue::from("https://example.org/left.sssom.tsv"))
    );

    let splits = merged.split_by_prefix().expect("split");
    assert!(splits.contains_key("mondo_exactmatch_doid"));
    assert!(splits.contains_key("mondo_broadmatch_hp"));
    assert!(splits.contains_key("doid_closematch_mondo"));
}

#[test]
fn test_selected_split_cliques_and_ptable() {
    let merged = merge(&left_table(), &right_table(), false).expect("merge");

    let selection = SplitSelection::new(["MONDO"], ["DOID"], ["skos:exactMatch"]);
    let splits = split_by_prefix_selected(&merged, &selection, &MappingSetConfig::default())
        .expect("split");
    assert_eq!(splits.keys().collect::<Vec<_>>(), vec!["mondo_exactmatch_doid"]);

    // MONDO:1 exactMatch DOID:4 and DOID:4 closeMatch MONDO:1 are one clique.
    let cliques = merged.split_into_cliques();
    assert_eq!(cliques[0].len(), 2);
    assert_eq!(cliques.iter().map(MappingSetTable::len).sum::<usize>(), merged.len());

    let ptable = merged.to_ptable(DEFAULT_INVERSE_FACTOR).expect("ptable");
    assert!(ptable
        .iter()
        .all(|row| (row.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9));
    // The negated MONDO:3 row has no predicate class and is left out.
    let mondo3: Vec<_> = ptable
        .iter()
        .filter(|row| row.subject_id == "MONDO:0000003")
        .collect();
    assert_eq!(mondo3.len(), 1);
    assert_eq!(mondo3[0].probabilities[2], 0.6);
}

#[test]
fn test_inject_metadata_joins_values() {
    let table = left_table();
    let mut overrides = std::collections::BTreeMap::new();
    overrides.insert(
        "creator_id".to_string(),
        vec!["orcid:0000-0001".to_string(), "orcid:0000-0002".to_string()],
    );
    let rows = inject_metadata(table.rows(), &overrides).expect("inject");
    assert_eq!(rows[0].get_text("creator_id"), Some("orcid:0000-0001|orcid:0000-0002"));
    assert_eq!(rows[1].get_text("creator_id"), Some("orcid:0000-0001|orcid:0000-0002"));
}

// ============================================================================
// Predicate lists
// ============================================================================

#[test]
fn test_extract_iris_from_file_and_literals() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("predicates.txt");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "skos:exactMatch")?;
    writeln!(file, "skos:broadMatch")?;
    drop(file);

    let entries = vec![path.to_string_lossy().to_string(), "skos:exactMatch".to_string()];
    let iris = extract_iris(&entries, &default_extended_prefix_map())?;
    assert_eq!(
        iris,
        vec![
            "http://www.w3.org/2004/02/skos/core#exactMatch".to_string(),
            "http://www.w3.org/2004/02/skos/core#broadMatch".to_string(),
            "http://www.w3.org/2004/02/skos/core#exactMatch".to_string(),
        ]
    );
    Ok(())
}
