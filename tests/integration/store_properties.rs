//! Property-based tests for the store invariants.

use pathstore::config::StoreConfig;
use pathstore::value_index::precedes;
use pathstore::{NodeId, Store};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Create(String),
    Set(String, String),
    Delete(String),
}

fn arbitrary_path() -> impl Strategy<Value = String> {
    // Few short components so operations collide often; depths up to 6.
    prop::collection::vec("[a-d]", 1..7).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn arbitrary_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[xyz]"]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arbitrary_path().prop_map(Op::Create),
        4 => (arbitrary_path(), arbitrary_value()).prop_map(|(p, v)| Op::Set(p, v)),
        1 => arbitrary_path().prop_map(Op::Delete),
    ]
}

fn apply(store: &mut Store, op: &Op) {
    match op {
        Op::Create(path) => {
            store.create(path).unwrap();
        }
        Op::Set(path, value) => {
            store.set(path, value).unwrap();
        }
        Op::Delete(path) => {
            let _ = store.delete(path);
        }
    }
}

/// First valued node in a full creation-ordered pre-order walk
fn brute_force_search(store: &Store, value: &str) -> Option<NodeId> {
    store
        .tree()
        .preorder(store.root())
        .find(|(_, node)| node.value() == Some(value))
        .map(|(id, _)| id)
}

fn new_store() -> Store {
    // A tiny table forces unrelated values to share buckets.
    Store::with_config(&StoreConfig {
        bucket_count: 3,
        max_nodes: None,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Both child indexes agree and every LexIndex stays balanced
    #[test]
    fn indexes_stay_consistent(ops in prop::collection::vec(arbitrary_op(), 1..80)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.check_consistency(), "inconsistent after {:?}", op);
        }
    }

    /// Value search agrees with a full pre-order traversal
    #[test]
    fn search_matches_preorder_walk(ops in prop::collection::vec(arbitrary_op(), 1..80)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        for value in ["", "x", "y", "z"] {
            prop_assert_eq!(store.search(value), brute_force_search(&store, value));
        }
    }

    /// New nodes always receive a creation time above every earlier one
    #[test]
    fn creation_times_strictly_increase(ops in prop::collection::vec(arbitrary_op(), 1..80)) {
        let mut store = new_store();
        let mut highest = 0;
        for op in &ops {
            let before = store.tree().next_creation_time();
            apply(&mut store, op);
            for (_, node) in store.tree().preorder(store.root()) {
                if node.creation_time() >= before {
                    prop_assert!(node.creation_time() > highest);
                }
            }
            highest = highest.max(store.tree().next_creation_time() - 1);
        }
    }

    /// The tie-break is a strict total order consistent with pre-order
    #[test]
    fn tie_break_orders_like_preorder(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        let order: Vec<NodeId> = store.tree().preorder(store.root()).map(|(id, _)| id).collect();
        for (i, &earlier) in order.iter().enumerate() {
            for &later in &order[i + 1..] {
                prop_assert!(precedes(store.tree(), earlier, later));
                prop_assert!(!precedes(store.tree(), later, earlier));
            }
            prop_assert!(!precedes(store.tree(), earlier, earlier));
        }
    }
}

#[test]
fn tie_break_across_very_different_depths() {
    let mut store = new_store();
    let deep_path = format!("/early{}", "/n".repeat(200));
    store.create("/early").unwrap();
    store.create("/late").unwrap();
    let shallow = store.set("/late", "v").unwrap();
    let deep = store.set(&deep_path, "v").unwrap();
    assert_eq!(store.search("v"), Some(deep));
    assert!(precedes(store.tree(), deep, shallow));

    store.delete("/early").unwrap();
    assert_eq!(store.search("v"), Some(shallow));
}
