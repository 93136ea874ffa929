//! Property tests for keyed reconciliation across node kinds
//!
//! Each key carries a kind (one of two tags or a view function), so keys
//! survive, move, and change type within the same pass.

mod common;

use std::collections::HashMap;

use common::{child_texts, cycle, new_dom, reconciler};
use proptest::prelude::*;
use twig_core::{ErrorMode, LiveId, LiveTree, Node, ViewContext, ViewFn};

const KEYS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Li,
    P,
    View,
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Li), Just(Kind::P), Just(Kind::View)]
}

fn items() -> impl Strategy<Value = Vec<(&'static str, Kind)>> {
    proptest::sample::subsequence(KEYS.to_vec(), 0..=KEYS.len())
        .prop_shuffle()
        .prop_flat_map(|keys| {
            let n = keys.len();
            (Just(keys), proptest::collection::vec(kind(), n))
        })
        .prop_map(|(keys, kinds)| keys.into_iter().zip(kinds).collect())
}

/// Renders `<em>` holding the `label` prop
fn label_view() -> ViewFn {
    ViewFn::new("Label", |cx: &ViewContext<'_>| {
        let label = cx
            .props
            .get("label")
            .and_then(|v| v.as_attribute())
            .unwrap_or_default();
        Node::tag("em").with_child(Node::text(label))
    })
}

fn build(items: &[(&str, Kind)], view: &ViewFn) -> Node {
    Node::tag("ul").with_children(items.iter().map(|(key, kind)| match kind {
        Kind::Li => Node::tag("li").with_key(key).with_child(Node::text(*key)),
        Kind::P => Node::tag("p").with_key(key).with_child(Node::text(*key)),
        Kind::View => Node::component(view).with_key(key).with_prop("label", *key),
    }))
}

fn expected_tag(kind: Kind) -> &'static str {
    match kind {
        Kind::Li => "li",
        Kind::P => "p",
        Kind::View => "em",
    }
}

proptest! {
    #[test]
    fn prop_mixed_kinds_follow_new_order(old_items in items(), new_items in items()) {
        let (mut dom, root) = new_dom();
        let r = reconciler(ErrorMode::Diagnostic);
        let view = label_view();

        let mut old = build(&old_items, &view);
        cycle(&r, &mut dom, root, None, &mut old);
        let ul = old.live().unwrap();

        let mut new = build(&new_items, &view);
        let (_, _, report) = cycle(&r, &mut dom, root, Some(&old), &mut new);
        prop_assert_eq!(report.skipped, 0);

        // Live order and kinds are the new ones
        let expected: Vec<String> = new_items.iter().map(|(k, _)| k.to_string()).collect();
        prop_assert_eq!(child_texts(&dom, ul), expected);
        let live_children = dom.children(ul);
        for (i, (_, kind)) in new_items.iter().enumerate() {
            prop_assert_eq!(dom.tag(live_children[i]), Some(expected_tag(*kind)));
        }

        // Every new Node owns the live node at its position
        for (i, child) in new.children().iter().enumerate() {
            prop_assert_eq!(child.live(), Some(live_children[i]));
        }

        // Tags that keep their key and kind keep their live node
        let before: HashMap<&str, (Kind, LiveId)> = old_items
            .iter()
            .zip(old.children())
            .map(|((key, kind), node)| (*key, (*kind, node.live().unwrap())))
            .collect();
        for ((key, kind), node) in new_items.iter().zip(new.children()) {
            if let Some((old_kind, old_live)) = before.get(key) {
                if old_kind == kind && *kind != Kind::View {
                    prop_assert_eq!(node.live(), Some(*old_live));
                }
            }
        }
    }
}
