//! Algebraic properties of the mapping-set operations.

use proptest::prelude::*;
use sssom_context::PrefixMap;
use sssom_mappings::{
    compare, filter_out_prefixes, filter_prefixes, invert_mappings, InversePredicates, Mapping,
    MappingSetTable,
};

// ============================================================================
// Strategies
// ============================================================================

const PREFIXES: [&str; 4] = ["x", "y", "z", "w"];

fn prefix_map() -> PrefixMap {
    PREFIXES
        .iter()
        .map(|p| (p.to_string(), format!("http://{p}.example.org/")))
        .collect()
}

fn entity() -> impl Strategy<Value = String> {
    (proptest::sample::select(PREFIXES.to_vec()), 0u8..6).prop_map(|(p, n)| format!("{p}:{n}"))
}

fn predicate() -> impl Strategy<Value = String> {
    proptest::sample::select(vec![
        "skos:exactMatch",
        "skos:broadMatch",
        "skos:narrowMatch",
        "skos:closeMatch",
        "owl:equivalentClass",
        "rdfs:subClassOf",
    ])
    .prop_map(str::to_string)
}

fn mapping() -> impl Strategy<Value = Mapping> {
    (entity(), predicate(), entity()).prop_map(|(s, p, o)| Mapping::new(s, p, o))
}

fn table() -> impl Strategy<Value = MappingSetTable> {
    proptest::collection::vec(mapping(), 0..24).prop_map(|rows| {
        MappingSetTable::new(rows, Some(&prefix_map()), None).expect("generated rows are valid")
    })
}

fn prefix_subset() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(PREFIXES.to_vec(), 1..=PREFIXES.len())
}

const COLUMNS: [&str; 2] = ["subject_id", "object_id"];

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn filter_and_filter_out_partition_rows(t in table(), prefixes in prefix_subset()) {
        let kept = filter_prefixes(t.rows(), &prefixes, &COLUMNS, false).unwrap();
        let dropped = filter_out_prefixes(t.rows(), &prefixes, &COLUMNS, false).unwrap();
        prop_assert_eq!(kept.len() + dropped.len(), t.len());
        for row in &dropped {
            prop_assert!(!kept.contains(row));
        }
    }

    #[test]
    fn require_all_filter_is_contained_in_require_any(t in table(), prefixes in prefix_subset()) {
        let all = filter_prefixes(t.rows(), &prefixes, &COLUMNS, true).unwrap();
        let any = filter_prefixes(t.rows(), &prefixes, &COLUMNS, false).unwrap();
        prop_assert!(all.len() <= any.len());
        for row in &all {
            prop_assert!(any.contains(row));
        }
    }

    #[test]
    fn diff_is_symmetric(a in table(), b in table()) {
        let ab = compare(&a, &b);
        let ba = compare(&b, &a);
        prop_assert_eq!(&ab.unique_left, &ba.unique_right);
        prop_assert_eq!(&ab.unique_right, &ba.unique_left);
        prop_assert_eq!(&ab.common, &ba.common);
        prop_assert!(ab.unique_left.is_disjoint(&ab.common));
        prop_assert!(ab.unique_right.is_disjoint(&ab.common));
    }

    #[test]
    fn double_inversion_restores_rows(t in table()) {
        let inverses = InversePredicates::sssom();
        prop_assume!(inverses.is_symmetric());
        let once = invert_mappings(t.rows(), None, false, &inverses);
        let twice = invert_mappings(&once, None, false, &inverses);
        prop_assert_eq!(twice.as_slice(), t.rows());
    }

    #[test]
    fn non_strict_clean_is_idempotent(t in table()) {
        let mut once = t.clone();
        once.clean_prefix_map(false).unwrap();
        let mut twice = once.clone();
        twice.clean_prefix_map(false).unwrap();
        prop_assert_eq!(once.prefix_map(), twice.prefix_map());
        prop_assert_eq!(once.rows(), t.rows());
    }

    #[test]
    fn strict_clean_failure_changes_nothing(t in table(), extra in mapping()) {
        let mut rows = t.rows().to_vec();
        rows.push(Mapping::new("undefined:1", extra.predicate_id, extra.object_id));
        let mut table = MappingSetTable::new(rows, Some(&prefix_map()), None).unwrap();
        let before = table.prefix_map().clone();
        prop_assert!(table.clean_prefix_map(true).is_err());
        prop_assert_eq!(table.prefix_map(), &before);
    }

    #[test]
    fn removing_own_subset_shrinks_by_its_matches(t in table(), prefixes in prefix_subset()) {
        let subset = t.filter_prefixes(&prefixes, &COLUMNS, false).unwrap();
        let mut reduced = t.clone();
        reduced.remove_mappings(&subset);
        let expected = filter_out_prefixes(t.rows(), &prefixes, &COLUMNS, false).unwrap();
        prop_assert_eq!(reduced.rows(), expected.as_slice());
    }
}
