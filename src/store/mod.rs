//! Path Store
//!
//! Facade over the path tree and the value index. Every operation takes
//! plain path or value strings; mutations either apply completely or return
//! an error with nothing changed.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::tree::{FileTree, Node, SEPARATOR};
use crate::types::NodeId;
use crate::value_index::ValueIndex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::debug;

/// One row of [`Store::print`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    pub value: String,
}

/// Hierarchical key/value store
#[derive(Debug)]
pub struct Store {
    tree: FileTree,
    values: ValueIndex,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Store {
            tree: FileTree::with_node_limit(config.max_nodes),
            values: ValueIndex::new(config.bucket_count),
        }
    }

    /// Resolve `path`, creating missing components along the way
    pub fn create(&mut self, path: &str) -> Result<NodeId, StoreError> {
        self.tree.create(path)
    }

    /// Resolve `path` without creating anything
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.tree.resolve(path)
    }

    /// Create `path` if needed and store `value` on it.
    ///
    /// Replaces any previous value, including its value-index registration.
    pub fn set(&mut self, path: &str, value: &str) -> Result<NodeId, StoreError> {
        let mut owned = String::new();
        owned.try_reserve_exact(value.len())?;
        owned.push_str(value);
        self.values.try_reserve(value)?;

        let id = self.tree.create(path)?;
        let previous = self.tree.replace_value(id, Some(owned));
        self.values.remove(id, previous.as_deref());
        self.values.insert(id, value);
        debug!(node = %id, path, "value set");
        Ok(id)
    }

    /// Delete the node at `path` and everything below it.
    ///
    /// A path without components names the root; deleting it clears the
    /// store but keeps the root. Returns the number of nodes destroyed.
    pub fn delete(&mut self, path: &str) -> Result<usize, StoreError> {
        let id = self
            .find(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(self.delete_node(id))
    }

    /// Delete `id` and its descendants; see [`Store::delete`]
    pub fn delete_node(&mut self, id: NodeId) -> usize {
        let values = &mut self.values;
        let destroyed = self.tree.remove_subtree(id, |node_id, node| {
            values.remove(node_id, node.value());
        });
        debug!(node = %id, destroyed, "delete");
        destroyed
    }

    /// Delete every node below the root
    pub fn clear(&mut self) -> usize {
        let root = self.tree.root();
        self.delete_node(root)
    }

    /// First node holding `value`, in creation-ordered pre-order
    pub fn search(&self, value: &str) -> Option<NodeId> {
        self.values.search(value, &self.tree)
    }

    /// Every valued node as `(path, value)`, in creation-ordered pre-order
    pub fn print(&self) -> Vec<Entry> {
        let mut entries = Vec::new();
        let mut stack = vec![(self.tree.root(), String::new())];
        while let Some((id, path)) = stack.pop() {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            for child in node.children_by_time().rev() {
                if let Some(child_node) = self.tree.node(child) {
                    let mut child_path =
                        String::with_capacity(path.len() + 1 + child_node.component().len());
                    child_path.push_str(&path);
                    child_path.push(SEPARATOR);
                    child_path.push_str(child_node.component());
                    stack.push((child, child_path));
                }
            }
            if let Some(value) = node.value() {
                let path = if path.is_empty() {
                    SEPARATOR.to_string()
                } else {
                    path
                };
                entries.push(Entry {
                    path,
                    value: value.to_string(),
                });
            }
        }
        entries
    }

    /// Write [`Store::print`] as `"path value"` lines
    pub fn write_print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for entry in self.print() {
            writeln!(out, "{} {}", entry.path, entry.value)?;
        }
        Ok(())
    }

    /// Components of the children of `path`, in ascending order
    pub fn list(&self, path: &str) -> Option<Vec<String>> {
        let id = self.find(path)?;
        self.children(id)
            .map(|names| names.into_iter().map(str::to_string).collect())
    }

    /// Components of the children of `id`, in ascending order
    pub fn children(&self, id: NodeId) -> Option<Vec<&str>> {
        let node = self.tree.node(id)?;
        Some(node.children_by_name().map(|(name, _)| name).collect())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.node(id)
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.tree.node(id).and_then(Node::value)
    }

    pub fn component(&self, id: NodeId) -> Option<&str> {
        self.tree.node(id).map(Node::component)
    }

    /// Absolute path of `id` (`/` for the root)
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        self.tree.path_of(id)
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Number of nodes below the root
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn value_index(&self) -> &ValueIndex {
        &self.values
    }

    /// Tree invariants plus: exactly the valued nodes are registered, and
    /// each of them can be found through the value index.
    pub fn check_consistency(&self) -> bool {
        if !self.tree.check_consistency() {
            return false;
        }
        let mut valued = 0;
        for (_, node) in self.tree.preorder(self.tree.root()) {
            let Some(value) = node.value() else {
                continue;
            };
            valued += 1;
            if self.values.search(value, &self.tree).is_none() {
                return false;
            }
        }
        valued == self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::with_config(&StoreConfig {
            bucket_count: 13,
            max_nodes: None,
        })
    }

    #[test]
    fn test_set_and_find() {
        let mut store = store();
        let id = store.set("/a/b", "hello world").unwrap();
        assert_eq!(store.find("/a/b"), Some(id));
        assert_eq!(store.value(id), Some("hello world"));
        assert_eq!(store.value(store.find("/a").unwrap()), None);
        assert!(store.check_consistency());
    }

    #[test]
    fn test_overwrite_moves_registration() {
        let mut store = store();
        let id = store.set("/p", "v").unwrap();
        store.set("/p", "v2").unwrap();
        assert_eq!(store.search("v"), None);
        assert_eq!(store.search("v2"), Some(id));
        assert_eq!(store.value_index().len(), 1);
    }

    #[test]
    fn test_empty_value_is_distinct_from_none() {
        let mut store = store();
        store.create("/none").unwrap();
        let empty = store.set("/empty", "").unwrap();
        assert_eq!(store.value(empty), Some(""));
        assert_eq!(store.search(""), Some(empty));
    }

    #[test]
    fn test_delete_unregisters_values() {
        let mut store = store();
        store.set("/a/x", "v").unwrap();
        store.set("/a/x/y", "w").unwrap();
        let other = store.set("/b", "v").unwrap();
        assert_eq!(store.delete("/a").unwrap(), 3);
        assert_eq!(store.search("w"), None);
        assert_eq!(store.search("v"), Some(other));
        assert_eq!(store.value_index().len(), 1);
        assert!(store.check_consistency());
    }

    #[test]
    fn test_delete_missing_path() {
        let mut store = store();
        assert_eq!(
            store.delete("/nope"),
            Err(StoreError::NotFound("/nope".to_string()))
        );
    }

    #[test]
    fn test_delete_root_path_clears() {
        let mut store = store();
        store.set("/a", "1").unwrap();
        store.set("/b/c", "2").unwrap();
        assert_eq!(store.delete("/").unwrap(), 3);
        assert!(store.is_empty());
        assert!(store.value_index().is_empty());
        assert!(store.print().is_empty());
    }

    #[test]
    fn test_print_and_write_print() {
        let mut store = store();
        store.set("/b", "2").unwrap();
        store.set("/a/z", "1").unwrap();
        store.set("/b/c", "3").unwrap();
        let mut out = Vec::new();
        store.write_print(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/b 2\n/b/c 3\n/a/z 1\n");
    }

    #[test]
    fn test_list_children() {
        let mut store = store();
        store.create("/d/zeta").unwrap();
        store.create("/d/alpha").unwrap();
        store.create("/top").unwrap();
        assert_eq!(store.list("/d"), Some(vec!["alpha".to_string(), "zeta".to_string()]));
        assert_eq!(store.list("/"), Some(vec!["d".to_string(), "top".to_string()]));
        assert_eq!(store.list("/d/alpha"), Some(vec![]));
        assert_eq!(store.list("/missing"), None);
    }

    #[test]
    fn test_set_over_node_limit_changes_nothing() {
        let mut store = Store::with_config(&StoreConfig {
            bucket_count: 13,
            max_nodes: Some(2),
        });
        store.set("/a", "keep").unwrap();
        let err = store.set("/a/b/c", "lost").unwrap_err();
        assert!(matches!(err, StoreError::OutOfMemory(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.search("lost"), None);
        assert_eq!(store.value(store.find("/a").unwrap()), Some("keep"));
        assert!(store.check_consistency());
    }
}
