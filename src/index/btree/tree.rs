//! The tree handle: order, root and the arena holding every node.

use crate::common::config::{DEFAULT_ORDER, MAX_ORDER, MIN_ORDER};
use crate::common::{Error, NodeId, Result};

use super::arena::NodeArena;
use super::iter::{LeafChain, RangeIter};
use super::node::{Key, LeafNode, Node};

/// A B+ tree of unique `i32` keys.
///
/// # Structure
/// ```text
///                    ┌──────────┐
///                    │  [7]     │            internal: separators copied
///                    └──┬────┬──┘            from the first key of the
///              ┌────────┘    └────────┐      right subtree
///        ┌─────┴─────┐          ┌─────┴─────┐
///        │ [1 3 5]   │ ───────▶ │ [7 8 9]   │  leaves, linked left to right
///        └───────────┘   next   └───────────┘
/// ```
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. The tree
/// owns the arena; dropping the tree releases every node.
///
/// # Example
/// ```
/// use bplustree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// for key in [5, 8, 1, 7, 3, 12, 9, 6] {
///     tree.insert(key);
/// }
///
/// assert!(tree.contains(7));
/// assert!(!tree.contains(100));
/// assert_eq!(tree.range(5, 9).collect::<Vec<_>>(), vec![5, 6, 7, 8, 9]);
/// ```
#[derive(Debug, Clone)]
pub struct BPlusTree {
    /// Max children per internal node; max keys per node is `order - 1`.
    pub(crate) order: usize,
    pub(crate) root: NodeId,
    pub(crate) arena: NodeArena,
    /// Number of keys stored.
    pub(crate) len: usize,
}

impl BPlusTree {
    /// Create an empty tree.
    ///
    /// # Errors
    /// Returns `Error::InvalidOrder` if `order` is outside
    /// `MIN_ORDER..=MAX_ORDER`.
    pub fn new(order: usize) -> Result<Self> {
        if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
            return Err(Error::InvalidOrder(order));
        }

        Ok(Self::empty(order))
    }

    fn empty(order: usize) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::Leaf(LeafNode::new()));

        Self {
            order,
            root,
            arena,
            len: 0,
        }
    }

    /// Reassemble a tree from an already-built arena.
    ///
    /// Used by the snapshot decoder; the caller validates the result.
    pub(crate) fn from_parts(order: usize, root: NodeId, arena: NodeArena, len: usize) -> Self {
        Self {
            order,
            root,
            arena,
            len,
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of keys in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node_id = self.root;
        while let Node::Internal(internal) = self.arena.get(node_id) {
            node_id = internal.child(0);
            height += 1;
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if `key` is in the tree.
    pub fn contains(&self, key: Key) -> bool {
        self.arena.leaf(self.find_leaf(key)).contains(key)
    }

    /// Point lookup; same as [`contains`](Self::contains).
    #[inline]
    pub fn search(&self, key: Key) -> bool {
        self.contains(key)
    }

    /// Iterate over every key in `[low, high]` in ascending order.
    ///
    /// The iterator is lazy and walks the leaf chain. Calling `range` again
    /// starts a fresh descent from the root.
    pub fn range(&self, low: Key, high: Key) -> RangeIter<'_> {
        if low > high {
            return RangeIter::empty(&self.arena);
        }
        let leaf_id = self.find_leaf(low);
        let start = self.arena.leaf(leaf_id).keys().partition_point(|&k| k < low);
        RangeIter::new(&self.arena, leaf_id, start, high)
    }

    /// Iterate over all keys in ascending order.
    pub fn iter(&self) -> RangeIter<'_> {
        RangeIter::new(&self.arena, self.first_leaf(), 0, Key::MAX)
    }

    /// Iterate over the leaves in chain order, yielding each leaf's keys.
    pub fn leaf_chain(&self) -> LeafChain<'_> {
        LeafChain::new(&self.arena, self.first_leaf())
    }

    /// Smallest key, if any.
    pub fn min_key(&self) -> Option<Key> {
        self.subtree_min(self.root)
    }

    /// Largest key, if any.
    pub fn max_key(&self) -> Option<Key> {
        let mut node_id = self.root;
        while let Node::Internal(internal) = self.arena.get(node_id) {
            node_id = *internal.children().last()?;
        }
        self.arena.leaf(node_id).keys().last().copied()
    }

    /// Drop every key, leaving an empty leaf as root.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.alloc(Node::Leaf(LeafNode::new()));
        self.len = 0;
    }

    /// Leaf whose key range contains `key`.
    pub(crate) fn find_leaf(&self, key: Key) -> NodeId {
        let mut node_id = self.root;
        while let Node::Internal(internal) = self.arena.get(node_id) {
            node_id = internal.child(internal.child_index(key));
        }
        node_id
    }

    /// Leftmost leaf, head of the leaf chain.
    pub(crate) fn first_leaf(&self) -> NodeId {
        self.leftmost_leaf(self.root)
    }

    pub(crate) fn leftmost_leaf(&self, mut node_id: NodeId) -> NodeId {
        while let Node::Internal(internal) = self.arena.get(node_id) {
            node_id = internal.child(0);
        }
        node_id
    }

    /// Smallest key reachable from `node_id`.
    pub(crate) fn subtree_min(&self, node_id: NodeId) -> Option<Key> {
        self.arena.leaf(self.leftmost_leaf(node_id)).keys().first().copied()
    }
}

impl Default for BPlusTree {
    fn default() -> Self {
        Self::empty(DEFAULT_ORDER)
    }
}

impl<'a> IntoIterator for &'a BPlusTree {
    type Item = Key;
    type IntoIter = RangeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Key> for BPlusTree {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
