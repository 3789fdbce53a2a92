//! Lexicographic child index
//!
//! AVL tree keyed by component string. Ordering is byte-wise on the UTF-8
//! representation, which is what `str`'s `Ord` implements.

use crate::types::NodeId;
use std::cmp::Ordering;
use std::rc::Rc;

#[derive(Debug)]
struct AvlNode {
    key: Rc<str>,
    node: NodeId,
    height: i32,
    left: Option<Box<AvlNode>>,
    right: Option<Box<AvlNode>>,
}

/// Children of one directory ordered by component
#[derive(Debug, Default)]
pub struct LexIndex {
    root: Option<Box<AvlNode>>,
    len: usize,
}

impl LexIndex {
    pub fn new() -> Self {
        LexIndex { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree (0 when empty)
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    /// Insert `node` under `key`.
    ///
    /// Returns `false` and leaves the tree untouched if the key is already
    /// present. The only allocation happens before the tree is modified.
    pub fn insert(&mut self, key: Rc<str>, node: NodeId) -> bool {
        if self.find(&key).is_some() {
            return false;
        }
        let leaf = Box::new(AvlNode {
            key,
            node,
            height: 1,
            left: None,
            right: None,
        });
        self.root = Some(insert_node(self.root.take(), leaf));
        self.len += 1;
        true
    }

    pub fn find(&self, key: &str) -> Option<NodeId> {
        let mut cursor = self.root.as_deref();
        while let Some(avl) = cursor {
            cursor = match key.cmp(&*avl.key) {
                Ordering::Less => avl.left.as_deref(),
                Ordering::Greater => avl.right.as_deref(),
                Ordering::Equal => return Some(avl.node),
            };
        }
        None
    }

    /// Remove the entry stored under `key`, returning the node it pointed to
    pub fn remove(&mut self, key: &str) -> Option<NodeId> {
        let mut removed = None;
        self.root = remove_node(self.root.take(), key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// In-order traversal: ascending component order
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    /// Verify AVL shape, cached heights and key ordering.
    pub fn check_invariants(&self) -> bool {
        check(&self.root, None, None).is_some()
    }
}

/// In-order iterator over a [`LexIndex`]
pub struct Iter<'a> {
    stack: Vec<&'a AvlNode>,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut cursor: Option<&'a AvlNode>) {
        while let Some(avl) = cursor {
            self.stack.push(avl);
            cursor = avl.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let avl = self.stack.pop()?;
        self.push_left_spine(avl.right.as_deref());
        Some((&*avl.key, avl.node))
    }
}

fn height(link: &Option<Box<AvlNode>>) -> i32 {
    link.as_ref().map_or(0, |avl| avl.height)
}

fn balance_factor(avl: &AvlNode) -> i32 {
    height(&avl.left) - height(&avl.right)
}

fn update_height(avl: &mut AvlNode) {
    avl.height = 1 + height(&avl.left).max(height(&avl.right));
}

fn rotate_left(mut avl: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut pivot) = avl.right.take() else {
        return avl;
    };
    avl.right = pivot.left.take();
    update_height(&mut avl);
    pivot.left = Some(avl);
    update_height(&mut pivot);
    pivot
}

fn rotate_right(mut avl: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut pivot) = avl.left.take() else {
        return avl;
    };
    avl.left = pivot.right.take();
    update_height(&mut avl);
    pivot.right = Some(avl);
    update_height(&mut pivot);
    pivot
}

fn rebalance(mut avl: Box<AvlNode>) -> Box<AvlNode> {
    update_height(&mut avl);
    let factor = balance_factor(&avl);
    if factor > 1 {
        // Left-right case
        if avl.left.as_deref().map_or(0, balance_factor) < 0 {
            avl.left = avl.left.take().map(rotate_left);
        }
        return rotate_right(avl);
    }
    if factor < -1 {
        // Right-left case
        if avl.right.as_deref().map_or(0, balance_factor) > 0 {
            avl.right = avl.right.take().map(rotate_right);
        }
        return rotate_left(avl);
    }
    avl
}

fn insert_node(link: Option<Box<AvlNode>>, leaf: Box<AvlNode>) -> Box<AvlNode> {
    let Some(mut avl) = link else {
        return leaf;
    };
    if leaf.key < avl.key {
        avl.left = Some(insert_node(avl.left.take(), leaf));
    } else {
        avl.right = Some(insert_node(avl.right.take(), leaf));
    }
    rebalance(avl)
}

fn remove_node(
    link: Option<Box<AvlNode>>,
    key: &str,
    removed: &mut Option<NodeId>,
) -> Option<Box<AvlNode>> {
    let mut avl = link?;
    match key.cmp(&*avl.key) {
        Ordering::Less => avl.left = remove_node(avl.left.take(), key, removed),
        Ordering::Greater => avl.right = remove_node(avl.right.take(), key, removed),
        Ordering::Equal => {
            if removed.is_none() {
                *removed = Some(avl.node);
            }
            match (avl.left.take(), avl.right.take()) {
                (None, None) => return None,
                (Some(only), None) | (None, Some(only)) => return Some(only),
                (Some(left), Some(right)) => {
                    // Take over the payload of the left subtree's maximum,
                    // then drop that node from the left subtree.
                    let (max_key, max_node) = max_payload(&left);
                    avl.key = Rc::clone(&max_key);
                    avl.node = max_node;
                    avl.left = remove_node(Some(left), &max_key, removed);
                    avl.right = Some(right);
                }
            }
        }
    }
    Some(rebalance(avl))
}

fn max_payload(mut avl: &AvlNode) -> (Rc<str>, NodeId) {
    while let Some(right) = avl.right.as_deref() {
        avl = right;
    }
    (Rc::clone(&avl.key), avl.node)
}

/// Returns the subtree height when the subtree is a valid AVL tree whose
/// keys all fall strictly between `lower` and `upper`.
fn check(link: &Option<Box<AvlNode>>, lower: Option<&str>, upper: Option<&str>) -> Option<i32> {
    let Some(avl) = link else {
        return Some(0);
    };
    if lower.is_some_and(|lower| &*avl.key <= lower) || upper.is_some_and(|upper| &*avl.key >= upper)
    {
        return None;
    }
    let left = check(&avl.left, lower, Some(&*avl.key))?;
    let right = check(&avl.right, Some(&*avl.key), upper)?;
    if (left - right).abs() > 1 || avl.height != 1 + left.max(right) {
        return None;
    }
    Some(avl.height)
}
