//! Path tree
//!
//! Owns every node in a generational arena. Each node indexes its children
//! twice, by component and by creation order, and this module is the only
//! place that touches those indexes so they can never disagree.
//!
//! Mutations reserve everything they may allocate before changing anything:
//! a failed reservation is reported as [`StoreError::OutOfMemory`] and leaves
//! the tree exactly as it was.

pub mod arena;
pub mod lex_index;
pub mod node;
pub mod order_index;

use crate::error::StoreError;
use crate::types::{CreationTime, NodeId};
use arena::Arena;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace, warn};

pub use lex_index::LexIndex;
pub use node::Node;
pub use order_index::{OrderHandle, OrderIndex};

/// Path separator
pub const SEPARATOR: char = '/';

/// Split a path into its non-empty components
pub fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|component| !component.is_empty())
}

/// Arena-backed tree of path components under an implicit root
#[derive(Debug)]
pub struct FileTree {
    nodes: Arena<NodeId, Node>,
    root: NodeId,
    next_time: CreationTime,
    max_nodes: Option<usize>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        Self::with_node_limit(None)
    }

    /// Tree that refuses to hold more than `max_nodes` non-root nodes
    pub fn with_node_limit(max_nodes: Option<usize>) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::root());
        FileTree {
            nodes,
            root,
            next_time: 1,
            max_nodes,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of nodes below the root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creation time the next node will receive
    pub fn next_creation_time(&self) -> CreationTime {
        self.next_time
    }

    /// Walk `path` from the root without creating anything
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let mut cursor = self.root;
        for component in components(path) {
            cursor = self.nodes.get(cursor)?.child_named(component)?;
        }
        Some(cursor)
    }

    /// Walk `path` from the root, creating every missing component.
    ///
    /// Either the whole path exists afterwards or nothing changed.
    pub fn create(&mut self, path: &str) -> Result<NodeId, StoreError> {
        let mut cursor = self.root;
        let mut parts = components(path).peekable();
        while let Some(component) = parts.peek() {
            match self.node(cursor).and_then(|node| node.child_named(component)) {
                Some(child) => {
                    cursor = child;
                    parts.next();
                }
                None => break,
            }
        }
        let missing: Vec<&str> = parts.collect();
        if missing.is_empty() {
            return Ok(cursor);
        }

        let fresh = self.prepare_chain(cursor, &missing)?;
        let mut parent = cursor;
        for node in fresh {
            parent = self.attach_child(parent, node);
        }
        Ok(parent)
    }

    /// Add a single child named `component` under `parent`.
    ///
    /// Returns the existing child when one already carries that component.
    pub fn add_child(&mut self, parent: NodeId, component: &str) -> Result<NodeId, StoreError> {
        let node = self
            .node(parent)
            .ok_or_else(|| StoreError::NotFound(format!("node {}", parent)))?;
        if let Some(existing) = node.child_named(component) {
            return Ok(existing);
        }
        let mut fresh = self.prepare_chain(parent, &[component])?;
        match fresh.pop() {
            Some(node) => Ok(self.attach_child(parent, node)),
            None => Err(StoreError::OutOfMemory("empty child chain".to_string())),
        }
    }

    /// Build detached nodes for `missing` below `parent`, reserving every
    /// slot the attach step will need.
    fn prepare_chain(&mut self, parent: NodeId, missing: &[&str]) -> Result<Vec<Node>, StoreError> {
        if let Some(max) = self.max_nodes {
            if self.len() + missing.len() > max {
                warn!(
                    live = self.len(),
                    requested = missing.len(),
                    max,
                    "node limit reached"
                );
                return Err(StoreError::OutOfMemory(format!(
                    "node limit of {} reached",
                    max
                )));
            }
        }

        let parent_depth = self
            .node(parent)
            .map(|node| node.depth)
            .ok_or_else(|| StoreError::NotFound(format!("node {}", parent)))?;
        self.nodes.try_reserve(missing.len())?;
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children_by_time.try_reserve()?;
        }

        let mut fresh = Vec::new();
        fresh.try_reserve_exact(missing.len())?;
        for (offset, component) in missing.iter().enumerate() {
            // Parent and creation time are patched in by `attach_child`.
            let mut node = Node::child(Rc::from(*component), parent, parent_depth + offset as u32, 0);
            if offset + 1 < missing.len() {
                node.children_by_time.try_reserve()?;
            }
            fresh.push(node);
        }
        Ok(fresh)
    }

    /// Link a prepared node under `parent` in both child indexes at once.
    fn attach_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent);
        node.creation_time = self.next_time;
        self.next_time += 1;
        let component = Rc::clone(&node.component);
        let creation_time = node.creation_time;
        let id = self.nodes.insert(node);

        let handle = match self.nodes.get_mut(parent) {
            Some(parent_node) => {
                parent_node.children_by_name.insert(Rc::clone(&component), id);
                Some(parent_node.children_by_time.push_back(id))
            }
            None => None,
        };
        if let Some(child) = self.nodes.get_mut(id) {
            child.self_handle = handle;
        }
        debug!(node = %id, component = %component, creation_time, "node created");
        id
    }

    /// Unlink `id` from both of its parent's child indexes.
    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (Some(parent), handle) = (node.parent, node.self_handle) else {
            return;
        };
        let component = Rc::clone(&node.component);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children_by_name.remove(&component);
            if let Some(handle) = handle {
                parent_node.children_by_time.remove(handle);
            }
        }
        trace!(node = %id, parent = %parent, "node detached");
    }

    /// Destroy `id` and everything below it, bottom-up.
    ///
    /// `on_destroy` sees every node after it has left the tree. Passing the
    /// root clears its children but keeps the root itself. Returns the
    /// number of nodes destroyed.
    pub fn remove_subtree<F>(&mut self, id: NodeId, mut on_destroy: F) -> usize
    where
        F: FnMut(NodeId, Node),
    {
        if !self.nodes.contains(id) {
            return 0;
        }
        let mut destroyed = 0;
        let mut stack = vec![id];
        while let Some(&top) = stack.last() {
            let first_child = self
                .nodes
                .get(top)
                .and_then(|node| node.children_by_time.first());
            if let Some(child) = first_child {
                stack.push(child);
                continue;
            }
            stack.pop();
            if top == self.root {
                continue;
            }
            self.detach(top);
            if let Some(node) = self.nodes.remove(top) {
                destroyed += 1;
                on_destroy(top, node);
            }
        }
        debug!(node = %id, destroyed, "subtree removed");
        destroyed
    }

    /// Replace the value of `id`, returning the previous one
    pub fn replace_value(&mut self, id: NodeId, value: Option<String>) -> Option<String> {
        let node = self.nodes.get_mut(id)?;
        std::mem::replace(&mut node.value, value)
    }

    /// Absolute path of `id` (`/` for the root)
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut parts = Vec::new();
        let mut cursor = self.nodes.get(id)?;
        while let Some(parent) = cursor.parent {
            parts.push(&*cursor.component);
            cursor = self.nodes.get(parent)?;
        }
        if parts.is_empty() {
            return Some(SEPARATOR.to_string());
        }
        let mut path = String::new();
        for component in parts.iter().rev() {
            path.push(SEPARATOR);
            path.push_str(component);
        }
        Some(path)
    }

    /// Pre-order walk from `start`, children visited in creation order
    pub fn preorder(&self, start: NodeId) -> PreOrder<'_> {
        let stack = if self.nodes.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        PreOrder { tree: self, stack }
    }

    /// Check the structural invariants of the whole tree.
    ///
    /// Both child indexes of every node must hold the same children, every
    /// lexicographic index must be a valid AVL tree, depths and parent links
    /// must agree, and creation times must be unique.
    pub fn check_consistency(&self) -> bool {
        let mut times = HashSet::new();
        for (id, node) in self.nodes.iter() {
            if !times.insert(node.creation_time) || node.creation_time >= self.next_time {
                return false;
            }
            if !node.children_by_name.check_invariants()
                || node.children_by_name.len() != node.children_by_time.len()
            {
                return false;
            }
            for child in node.children_by_time.iter() {
                let Some(child_node) = self.nodes.get(child) else {
                    return false;
                };
                if child_node.parent != Some(id)
                    || child_node.depth != node.depth + 1
                    || node.children_by_name.find(&child_node.component) != Some(child)
                {
                    return false;
                }
            }
            match node.parent {
                None if id != self.root => return false,
                Some(parent) if !self.nodes.contains(parent) => return false,
                _ => {}
            }
        }
        true
    }
}

/// Iterator returned by [`FileTree::preorder`]
pub struct PreOrder<'a> {
    tree: &'a FileTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.nodes.get(id)?;
        self.stack.extend(node.children_by_time.iter().rev());
        Some((id, node))
    }
}
