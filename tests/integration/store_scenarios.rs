//! Store behavior scenarios over paths, values and deletes

use pathstore::config::StoreConfig;
use pathstore::{Store, StoreError};

fn small_store() -> Store {
    Store::with_config(&StoreConfig {
        bucket_count: 17,
        max_nodes: None,
    })
}

fn printed_paths(store: &Store) -> Vec<String> {
    store.print().into_iter().map(|entry| entry.path).collect()
}

#[test]
fn create_then_find_returns_same_node() {
    let mut store = small_store();
    let created = store.create("/a/b/c").unwrap();
    assert_eq!(store.find("/a/b/c"), Some(created));
    assert_eq!(store.create("/a/b/c").unwrap(), created);
    assert_eq!(store.len(), 3);
}

#[test]
fn repeated_and_leading_separators_are_ignored() {
    let mut store = small_store();
    let id = store.create("a//b///").unwrap();
    assert_eq!(store.find("/a/b"), Some(id));
    assert_eq!(store.path_of(id).as_deref(), Some("/a/b"));
}

#[test]
fn list_is_lexicographic_print_is_creation_order() {
    let mut store = small_store();
    store.set("/a/c", "second").unwrap();
    store.set("/a/b", "first").unwrap();
    assert_eq!(
        store.list("/a"),
        Some(vec!["b".to_string(), "c".to_string()])
    );
    assert_eq!(printed_paths(&store), vec!["/a/c", "/a/b"]);

    let mut store = small_store();
    store.set("/a/b", "first").unwrap();
    store.set("/a/c", "second").unwrap();
    assert_eq!(
        store.list("/a"),
        Some(vec!["b".to_string(), "c".to_string()])
    );
    assert_eq!(printed_paths(&store), vec!["/a/b", "/a/c"]);
}

#[test]
fn overwrite_moves_value_lookup() {
    let mut store = small_store();
    let id = store.set("/p", "v").unwrap();
    store.set("/p", "v2").unwrap();
    assert_eq!(store.value(store.find("/p").unwrap()), Some("v2"));
    assert_eq!(store.search("v"), None);
    assert_eq!(store.search("v2"), Some(id));
}

#[test]
fn search_prefers_earlier_created_subtree() {
    let mut store = small_store();
    store.set("/a/x", "v").unwrap();
    store.set("/b/y", "v").unwrap();
    let found = store.search("v").unwrap();
    assert_eq!(store.path_of(found).as_deref(), Some("/a/x"));
}

#[test]
fn search_ignores_later_deeper_sibling_order_inside_subtree() {
    let mut store = small_store();
    store.create("/a").unwrap();
    store.create("/b").unwrap();
    // Set in /b first, and deep in /a later: /a still wins.
    store.set("/b/y", "v").unwrap();
    store.set("/a/p/q/r/s", "v").unwrap();
    let found = store.search("v").unwrap();
    assert_eq!(store.path_of(found).as_deref(), Some("/a/p/q/r/s"));
}

#[test]
fn delete_removes_descendants_only() {
    let mut store = small_store();
    store.set("/a/x", "1").unwrap();
    store.set("/a/x/deep", "2").unwrap();
    let sibling = store.set("/a/y", "3").unwrap();
    let sibling_time = store.node(sibling).unwrap().creation_time();

    assert_eq!(store.delete("/a/x").unwrap(), 2);
    assert_eq!(store.find("/a/x"), None);
    assert_eq!(store.find("/a/x/deep"), None);
    assert_eq!(store.find("/a/y"), Some(sibling));
    assert_eq!(store.node(sibling).unwrap().creation_time(), sibling_time);
    assert_eq!(store.search("2"), None);
    assert!(store.check_consistency());
}

#[test]
fn whole_tree_delete_then_recreate() {
    let mut store = small_store();
    store.set("/a/x", "v").unwrap();
    store.set("/b/y", "v").unwrap();
    let highest = [store.find("/a/x").unwrap(), store.find("/b/y").unwrap()]
        .iter()
        .map(|id| store.node(*id).unwrap().creation_time())
        .max()
        .unwrap();

    store.clear();
    assert_eq!(store.find("/a/x"), None);
    assert_eq!(store.find("/b/y"), None);
    assert_eq!(store.search("v"), None);

    let fresh = store.create("/a/x").unwrap();
    assert!(store.node(fresh).unwrap().creation_time() > highest);
}

#[test]
fn delete_of_missing_path_is_not_found() {
    let mut store = small_store();
    store.create("/a").unwrap();
    assert!(matches!(store.delete("/a/b"), Err(StoreError::NotFound(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn failed_create_leaves_no_orphans() {
    let mut store = Store::with_config(&StoreConfig {
        bucket_count: 17,
        max_nodes: Some(4),
    });
    store.set("/a/b", "keep").unwrap();
    let before = store.print();

    let err = store.set("/a/c/d/e", "drop").unwrap_err();
    assert!(matches!(err, StoreError::OutOfMemory(_)));
    assert_eq!(store.find("/a/c"), None);
    assert_eq!(store.len(), 2);
    assert_eq!(store.print(), before);
    assert_eq!(store.search("drop"), None);
    assert!(store.check_consistency());

    // Still usable up to the limit.
    store.set("/a/c/d", "fits").unwrap();
    assert_eq!(store.len(), 4);
}
