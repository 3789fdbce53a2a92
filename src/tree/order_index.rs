//! Creation-order child index
//!
//! Doubly linked list of children in insertion order. Links live in a slot
//! arena owned by the list; the handle returned by `push_back` unlinks its
//! entry in O(1).

use super::arena::{Arena, ArenaKey};
use crate::types::NodeId;
use std::collections::TryReserveError;

/// Handle to one link of an [`OrderIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle {
    index: u32,
    generation: u32,
}

impl ArenaKey for OrderHandle {
    fn from_parts(index: u32, generation: u32) -> Self {
        OrderHandle { index, generation }
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Link {
    node: NodeId,
    prev: Option<OrderHandle>,
    next: Option<OrderHandle>,
}

/// Children of one directory in creation order
#[derive(Debug, Default)]
pub struct OrderIndex {
    links: Arena<OrderHandle, Link>,
    first: Option<OrderHandle>,
    last: Option<OrderHandle>,
}

impl OrderIndex {
    pub fn new() -> Self {
        OrderIndex {
            links: Arena::new(),
            first: None,
            last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Make sure the next `push_back` cannot allocate.
    pub fn try_reserve(&mut self) -> Result<(), TryReserveError> {
        self.links.try_reserve(1)
    }

    /// Append `node` at the tail
    pub fn push_back(&mut self, node: NodeId) -> OrderHandle {
        let handle = self.links.insert(Link {
            node,
            prev: self.last,
            next: None,
        });
        match self.last.and_then(|last| self.links.get_mut(last)) {
            Some(last) => last.next = Some(handle),
            None => self.first = Some(handle),
        }
        self.last = Some(handle);
        handle
    }

    /// Unlink the entry behind `handle`, returning the node it carried
    pub fn remove(&mut self, handle: OrderHandle) -> Option<NodeId> {
        let link = self.links.remove(handle)?;
        match link.prev.and_then(|prev| self.links.get_mut(prev)) {
            Some(prev) => prev.next = link.next,
            None => self.first = link.next,
        }
        match link.next.and_then(|next| self.links.get_mut(next)) {
            Some(next) => next.prev = link.prev,
            None => self.last = link.prev,
        }
        Some(link.node)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.first
            .and_then(|first| self.links.get(first))
            .map(|link| link.node)
    }

    /// Forward traversal in creation order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            front: self.first,
            back: self.last,
            remaining: self.len(),
        }
    }
}

/// Creation-order iterator over an [`OrderIndex`]
pub struct Iter<'a> {
    index: &'a OrderIndex,
    front: Option<OrderHandle>,
    back: Option<OrderHandle>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.index.links.get(self.front?)?;
        self.front = link.next;
        self.remaining -= 1;
        Some(link.node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.index.links.get(self.back?)?;
        self.back = link.prev;
        self.remaining -= 1;
        Some(link.node)
    }
}

impl ExactSizeIterator for Iter<'_> {}
