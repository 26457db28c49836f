//! Leaf and internal node layouts.
//!
//! Nodes only know about their own keys and child ids. Anything that touches
//! more than two nodes (the parent separator, the arena) lives in the tree.

use crate::common::NodeId;

/// Key type stored in the tree.
pub type Key = i32;

/// A node slot in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl Node {
    /// Number of keys held by this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if the node holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Keys (for leaves) or separators (for internal nodes).
    #[inline]
    pub fn keys(&self) -> &[Key] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Internal(internal) => &internal.keys,
        }
    }
}

/// A leaf: ascending keys plus the leaf-chain link to the next leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafNode {
    pub(crate) keys: Vec<Key>,
    /// Next leaf in ascending key order. Not an ownership edge.
    pub(crate) next: Option<NodeId>,
}

impl LeafNode {
    /// Create an empty leaf with no successor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf from keys that are already sorted.
    pub fn with_keys(keys: Vec<Key>) -> Self {
        debug_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        Self { keys, next: None }
    }

    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[inline]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Insert `key` in sorted position. Returns false if it was already here.
    pub(crate) fn insert_key(&mut self, key: Key) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.keys.insert(pos, key);
                true
            }
        }
    }

    /// Remove `key`. Returns false if it wasn't here.
    pub(crate) fn remove_key(&mut self, key: Key) -> bool {
        match self.keys.binary_search(&key) {
            Ok(pos) => {
                self.keys.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Move the upper half of the keys into a new leaf.
    ///
    /// The split point is `⌈n/2⌉`, so the left half keeps the extra key when
    /// `n` is odd. The new leaf inherits this leaf's successor; the caller
    /// links this leaf to the new one once it has an id.
    pub(crate) fn split_off(&mut self) -> LeafNode {
        let mid = self.keys.len().div_ceil(2);
        LeafNode {
            keys: self.keys.split_off(mid),
            next: self.next,
        }
    }

    /// Take the last key of `left` as this leaf's first key.
    ///
    /// Returns the new separator between `left` and `self`.
    pub(crate) fn borrow_from_left(&mut self, left: &mut LeafNode) -> Key {
        if let Some(key) = left.keys.pop() {
            self.keys.insert(0, key);
        }
        self.keys[0]
    }

    /// Take the first key of `right` as this leaf's last key.
    ///
    /// Returns the new separator between `self` and `right`.
    pub(crate) fn borrow_from_right(&mut self, right: &mut LeafNode) -> Key {
        let key = right.keys.remove(0);
        self.keys.push(key);
        right.keys[0]
    }

    /// Absorb the right sibling and take over its place in the leaf chain.
    pub(crate) fn merge(&mut self, right: LeafNode) {
        self.keys.extend(right.keys);
        self.next = right.next;
    }
}

/// An internal node: `k` separators and `k + 1` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
}

impl InternalNode {
    pub(crate) fn new(keys: Vec<Key>, children: Vec<NodeId>) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self { keys, children }
    }

    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of the child whose key range contains `key`.
    ///
    /// That is the first `i` with `key < keys[i]`, or the last child when no
    /// separator is greater than `key`.
    #[inline]
    pub fn child_index(&self, key: Key) -> usize {
        self.keys.partition_point(|&sep| sep <= key)
    }

    #[inline]
    pub fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    /// Insert `separator` at `index` with `right` as the child just after it.
    pub(crate) fn insert_child(&mut self, index: usize, separator: Key, right: NodeId) {
        self.keys.insert(index, separator);
        self.children.insert(index + 1, right);
    }

    /// Remove separator `index` and the child to its right.
    pub(crate) fn remove_child(&mut self, index: usize) -> (Key, NodeId) {
        let separator = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (separator, child)
    }

    /// Split around the median at `⌊n/2⌋`.
    ///
    /// The median key moves up (returned), keys and children above it move
    /// into the returned sibling.
    pub(crate) fn split_off(&mut self) -> (Key, InternalNode) {
        let mid = self.keys.len() / 2;
        let right_keys = self.keys.split_off(mid + 1);
        let right_children = self.children.split_off(mid + 1);
        let separator = self.keys[mid];
        self.keys.truncate(mid);
        (separator, InternalNode::new(right_keys, right_children))
    }

    /// Rotate through the parent: the old `separator` becomes this node's
    /// first key and `left`'s last child becomes this node's first child.
    ///
    /// Returns the new parent separator (`left`'s old last key).
    pub(crate) fn borrow_from_left(&mut self, left: &mut InternalNode, separator: Key) -> Key {
        match (left.keys.pop(), left.children.pop()) {
            (Some(key), Some(child)) => {
                self.keys.insert(0, separator);
                self.children.insert(0, child);
                key
            }
            _ => separator,
        }
    }

    /// Rotate through the parent from the right sibling.
    ///
    /// Returns the new parent separator (`right`'s old first key).
    pub(crate) fn borrow_from_right(&mut self, right: &mut InternalNode, separator: Key) -> Key {
        self.keys.push(separator);
        self.children.push(right.children.remove(0));
        right.keys.remove(0)
    }

    /// Absorb the right sibling, pulling the parent separator down between them.
    pub(crate) fn merge(&mut self, separator: Key, right: InternalNode) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}
