use std::collections::BTreeSet;

use proptest::prelude::*;
use sssom_context::{
    built_in_prefix_map, contract, expand, prune_to_used, reconcile, PrefixMap,
    SSSOM_BUILT_IN_PREFIXES,
};

fn prefix() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,6}").unwrap(),
        // Built-in names show up often enough to exercise overrides.
        proptest::sample::select(SSSOM_BUILT_IN_PREFIXES.to_vec()).prop_map(str::to_string),
    ]
}

fn namespace() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}")
        .unwrap()
        .prop_map(|host| format!("http://{host}.example.org/"))
}

fn prefix_map() -> impl Strategy<Value = PrefixMap> {
    proptest::collection::btree_map(prefix(), namespace(), 0..8).prop_map(PrefixMap::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn reconcile_is_idempotent(m in prefix_map()) {
        let once = reconcile(Some(&m));
        let twice = reconcile(Some(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_is_superset_of_input_and_missing_built_ins(m in prefix_map()) {
        let out = reconcile(Some(&m));
        for (p, ns) in m.iter() {
            prop_assert_eq!(out.get(p), Some(ns));
        }
        for (p, ns) in built_in_prefix_map().iter() {
            if !m.contains_prefix(p) {
                prop_assert_eq!(out.get(p), Some(ns));
            }
        }
    }

    #[test]
    fn non_strict_prune_is_idempotent(
        m in prefix_map(),
        used in proptest::collection::btree_set(prefix(), 0..6),
    ) {
        let m = reconcile(Some(&m));
        let once = prune_to_used(&m, &used, false).unwrap();
        let twice = prune_to_used(&once, &used, false).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn strict_prune_fails_exactly_when_something_is_missing(
        m in prefix_map(),
        used in proptest::collection::btree_set(prefix(), 0..6),
    ) {
        let m = reconcile(Some(&m));
        let missing: BTreeSet<&String> = used.iter().filter(|p| !m.contains_prefix(p)).collect();
        prop_assert_eq!(prune_to_used(&m, &used, true).is_err(), !missing.is_empty());
    }

    #[test]
    fn contracted_uris_expand_back(m in prefix_map(), local in "[A-Za-z0-9_]{1,8}") {
        for (_, ns) in m.iter() {
            let uri = format!("{ns}{local}");
            let curie = contract(&uri, &m);
            prop_assert_eq!(expand(&curie, &m), Some(uri));
        }
    }
}
