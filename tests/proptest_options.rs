//! Property-based tests using proptest
//!
//! These tests verify how list options are merged into request paths
//! using randomized inputs.

use atlas_client::atlas::{set_list_options, ListOptions};
use proptest::prelude::*;

/// Generate arbitrary list options
fn arb_options() -> impl Strategy<Value = ListOptions> {
    (
        proptest::option::of(1u32..1000),
        proptest::option::of(1u32..500),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        prop::collection::vec("[a-zA-Z]{1,12}", 0..4),
    )
        .prop_map(|(page_num, items_per_page, include_count, envelope, include_fields)| ListOptions {
            page_num,
            items_per_page,
            include_count,
            envelope,
            include_fields,
            ..Default::default()
        })
}

/// Generate a relative API path, optionally with a fixed query
fn arb_path() -> impl Strategy<Value = String> {
    (
        "[a-f0-9]{24}",
        prop_oneof![
            Just(String::new()),
            Just("?granularity=PT24H&period=PT24H".to_string()),
        ],
    )
        .prop_map(|(group, query)| format!("groups/{}/processes{}", group, query))
}

proptest! {
    /// No options means the path is untouched
    #[test]
    fn none_is_identity(path in arb_path()) {
        prop_assert_eq!(set_list_options(&path, None), path);
    }

    /// The original path and query always survive as a prefix
    #[test]
    fn existing_query_is_preserved(path in arb_path(), opts in arb_options()) {
        let merged = set_list_options(&path, Some(&opts));
        prop_assert!(merged.starts_with(&path));
    }

    /// Every set option shows up exactly once
    #[test]
    fn set_options_appear_once(path in arb_path(), opts in arb_options()) {
        let merged = set_list_options(&path, Some(&opts));
        let query = merged.split_once('?').map(|(_, q)| q).unwrap_or("");

        for (key, _) in opts.query_pairs() {
            let occurrences = query
                .split('&')
                .filter(|pair| pair.split('=').next() == Some(key))
                .count();
            prop_assert_eq!(occurrences, 1);
        }
    }

    /// Applying the same options twice changes nothing
    #[test]
    fn merge_is_idempotent(path in arb_path(), opts in arb_options()) {
        let once = set_list_options(&path, Some(&opts));
        let twice = set_list_options(&once, Some(&opts));
        prop_assert_eq!(once, twice);
    }
}
