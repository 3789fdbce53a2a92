//! Core types for the path store.

use std::fmt;

/// CreationTime: Global allocation stamp of a node (root = 0)
pub type CreationTime = u64;

/// NodeId: Stable handle to a node in the tree arena
///
/// The generation distinguishes a live node from an earlier occupant of the
/// same slot, so a handle kept across a delete never aliases a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        NodeId { index, generation }
    }

    /// Slot index inside the arena
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
