//! Property tests for keyed child reconciliation
//!
//! Arbitrary subsets and orderings of a small key space, reconciled from one
//! list to another.

mod common;

use std::collections::{HashMap, HashSet};

use common::{child_texts, cycle, item_lives, keyed_list, new_dom, reconciler};
use proptest::prelude::*;
use twig_core::ErrorMode;

const KEYS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn key_list() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(KEYS.to_vec(), 0..=KEYS.len()).prop_shuffle()
}

proptest! {
    #[test]
    fn prop_keyed_reconcile_matches_new_order(old_keys in key_list(), new_keys in key_list()) {
        let (mut dom, root) = new_dom();
        let r = reconciler(ErrorMode::Diagnostic);
        let mut old = keyed_list(&old_keys);
        cycle(&r, &mut dom, root, None, &mut old);
        let ul = old.live().unwrap();

        let mut new = keyed_list(&new_keys);
        let (_, pending, report) = cycle(&r, &mut dom, root, Some(&old), &mut new);

        // Live order is the new order
        prop_assert_eq!(child_texts(&dom, ul), new_keys.iter().map(|k| k.to_string()).collect::<Vec<_>>());

        // Surviving keys keep their live node
        let before: HashMap<String, _> = item_lives(&old).into_iter().collect();
        for (key, live) in item_lives(&new) {
            if let Some(previous) = before.get(&key) {
                prop_assert_eq!(*previous, live);
            }
        }

        // Exactly the vanished keys are deleted
        let kept: HashSet<_> = new_keys.iter().collect();
        let vanished = old_keys.iter().filter(|k| !kept.contains(k)).count();
        prop_assert_eq!(pending.deletions, vanished);
        prop_assert_eq!(report.deletions, vanished);
        prop_assert_eq!(report.skipped, 0);

        // Never more moves than children
        prop_assert!(pending.placements <= new_keys.len());
    }

    #[test]
    fn prop_second_identical_pass_is_structurally_empty(keys in key_list()) {
        let (mut dom, root) = new_dom();
        let r = reconciler(ErrorMode::Diagnostic);
        let mut first = keyed_list(&keys);
        cycle(&r, &mut dom, root, None, &mut first);

        let mut second = keyed_list(&keys);
        let (_, pending, _) = cycle(&r, &mut dom, root, Some(&first), &mut second);

        prop_assert_eq!(pending.placements, 0);
        prop_assert_eq!(pending.deletions, 0);
        prop_assert_eq!(item_lives(&second), item_lives(&first));
    }
}
