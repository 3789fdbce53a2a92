//! Value Index
//!
//! Reverse lookup from value to the node holding it. Buckets are chosen by a
//! polynomial string hash modulo a fixed prime table size. When several nodes
//! share a value, the one a creation-ordered pre-order walk would reach first
//! wins; the comparison climbs ancestor chains instead of walking the tree.
//!
//! The index never owns nodes. Entries are plain [`NodeId`]s into the tree,
//! and callers must unregister a node before it is destroyed.

use crate::tree::FileTree;
use crate::types::{CreationTime, NodeId};
use std::collections::TryReserveError;
use tracing::trace;

/// Default bucket count; must be prime
pub const DEFAULT_BUCKET_COUNT: usize = 65537;

const HASH_MULTIPLIER: u64 = 127;

/// Ancestry information the tie-break needs from the tree
pub trait Lineage {
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn depth(&self, node: NodeId) -> u32;
    fn creation_time(&self, node: NodeId) -> CreationTime;
    fn value(&self, node: NodeId) -> Option<&str>;
}

impl Lineage for FileTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent())
    }

    fn depth(&self, node: NodeId) -> u32 {
        self.node(node).map_or(0, |n| n.depth())
    }

    fn creation_time(&self, node: NodeId) -> CreationTime {
        self.node(node).map_or(0, |n| n.creation_time())
    }

    fn value(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.value())
    }
}

/// True if `lhs` comes before `rhs` in a pre-order walk that visits
/// children in creation order.
///
/// Both nodes are lifted to the same depth; if they meet, the shallower one
/// is an ancestor and comes first. Otherwise both climb until they are
/// siblings, and the sibling created first wins.
pub fn precedes<L: Lineage + ?Sized>(lineage: &L, lhs: NodeId, rhs: NodeId) -> bool {
    if lhs == rhs {
        return false;
    }
    let (lhs_depth, rhs_depth) = (lineage.depth(lhs), lineage.depth(rhs));
    let mut left = lift(lineage, lhs, lhs_depth.saturating_sub(rhs_depth));
    let mut right = lift(lineage, rhs, rhs_depth.saturating_sub(lhs_depth));
    if left == right {
        return lhs_depth < rhs_depth;
    }
    loop {
        match (lineage.parent(left), lineage.parent(right)) {
            (Some(left_parent), Some(right_parent)) if left_parent != right_parent => {
                left = left_parent;
                right = right_parent;
            }
            _ => break,
        }
    }
    lineage.creation_time(left) < lineage.creation_time(right)
}

fn lift<L: Lineage + ?Sized>(lineage: &L, mut node: NodeId, steps: u32) -> NodeId {
    for _ in 0..steps {
        match lineage.parent(node) {
            Some(parent) => node = parent,
            None => break,
        }
    }
    node
}

/// Hash table from value to candidate nodes
#[derive(Debug)]
pub struct ValueIndex {
    buckets: Vec<Vec<NodeId>>,
    len: usize,
}

impl Default for ValueIndex {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_COUNT)
    }
}

impl ValueIndex {
    /// Create an index with `bucket_count` buckets (clamped to at least one)
    pub fn new(bucket_count: usize) -> Self {
        let mut buckets = Vec::new();
        buckets.resize_with(bucket_count.max(1), Vec::new);
        ValueIndex { buckets, len: 0 }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bucket of `value`: `h = (127 * h + byte) mod bucket_count`
    pub fn bucket_of(&self, value: &str) -> usize {
        let modulus = self.buckets.len() as u64;
        value
            .bytes()
            .fold(0u64, |h, byte| (HASH_MULTIPLIER * h + u64::from(byte)) % modulus) as usize
    }

    /// Make sure registering a node under `value` cannot allocate.
    pub fn try_reserve(&mut self, value: &str) -> Result<(), TryReserveError> {
        let bucket = self.bucket_of(value);
        self.buckets[bucket].try_reserve(1)
    }

    /// Register `node` under `value`
    pub fn insert(&mut self, node: NodeId, value: &str) {
        let bucket = self.bucket_of(value);
        self.buckets[bucket].push(node);
        self.len += 1;
        trace!(node = %node, bucket, "value registered");
    }

    /// Unregister `node`, which was stored under `value`.
    ///
    /// A node without a value was never registered, so `None` is a no-op.
    pub fn remove(&mut self, node: NodeId, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let bucket = self.bucket_of(value);
        let entries = &mut self.buckets[bucket];
        match entries.iter().position(|entry| *entry == node) {
            Some(position) => {
                // Bucket order carries no meaning, the tie-break is a total order.
                entries.swap_remove(position);
                self.len -= 1;
                trace!(node = %node, bucket, "value unregistered");
                true
            }
            None => false,
        }
    }

    /// First node, in creation-ordered pre-order, whose value equals `value`
    pub fn search<L: Lineage + ?Sized>(&self, value: &str, lineage: &L) -> Option<NodeId> {
        self.buckets[self.bucket_of(value)]
            .iter()
            .copied()
            .filter(|&node| lineage.value(node) == Some(value))
            .reduce(|best, candidate| {
                if precedes(lineage, candidate, best) {
                    candidate
                } else {
                    best
                }
            })
    }
}
