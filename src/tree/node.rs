//! Tree node record

use super::lex_index::LexIndex;
use super::order_index::{OrderHandle, OrderIndex};
use crate::types::{CreationTime, NodeId};
use std::rc::Rc;

/// One path component, optionally carrying a value
///
/// Children are reachable through two indexes that always hold the same set:
/// `children_by_name` (lexicographic) and `children_by_time` (creation order).
/// Only [`FileTree`](super::FileTree) mutates them, and always both at once.
#[derive(Debug)]
pub struct Node {
    pub(crate) component: Rc<str>,
    pub(crate) value: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) creation_time: CreationTime,
    pub(crate) depth: u32,
    pub(crate) children_by_name: LexIndex,
    pub(crate) children_by_time: OrderIndex,
    /// Link into the parent's `children_by_time`
    pub(crate) self_handle: Option<OrderHandle>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Node {
            component: Rc::from(""),
            value: None,
            parent: None,
            creation_time: 0,
            depth: 0,
            children_by_name: LexIndex::new(),
            children_by_time: OrderIndex::new(),
            self_handle: None,
        }
    }

    pub(crate) fn child(
        component: Rc<str>,
        parent: NodeId,
        parent_depth: u32,
        creation_time: CreationTime,
    ) -> Self {
        Node {
            component,
            value: None,
            parent: Some(parent),
            creation_time,
            depth: parent_depth + 1,
            children_by_name: LexIndex::new(),
            children_by_time: OrderIndex::new(),
            self_handle: None,
        }
    }

    /// Path component (empty for the root)
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn creation_time(&self) -> CreationTime {
        self.creation_time
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn child_count(&self) -> usize {
        self.children_by_time.len()
    }

    /// Children in ascending component order
    pub fn children_by_name(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.children_by_name.iter()
    }

    /// Children in creation order
    pub fn children_by_time(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children_by_time.iter()
    }

    /// Child named `component`, if any
    pub fn child_named(&self, component: &str) -> Option<NodeId> {
        self.children_by_name.find(component)
    }

    pub fn lex_index(&self) -> &LexIndex {
        &self.children_by_name
    }
}
