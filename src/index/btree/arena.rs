//! Slot arena owning every node of a tree.
//!
//! Ownership edges (parent → child) and the leaf chain are plain [`NodeId`]s
//! into this arena. Dropping the arena releases every node at once, so
//! teardown never walks the tree and never follows the leaf chain.

use crate::common::NodeId;

use super::node::{InternalNode, LeafNode, Node};

#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Option<Node>>,
    /// Vacant slots, reused LIFO.
    free: Vec<NodeId>,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId::from_index(self.slots.len());
            self.slots.push(Some(node));
            id
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        match self.slots.get(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("`NodeArena::get()` - {} is vacant", id),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => panic!("`NodeArena::get_mut()` - {} is vacant", id),
        }
    }

    /// Mutable access to two distinct nodes at once (siblings during rebalancing).
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node, &mut Node) {
        assert_ne!(a, b, "`NodeArena::pair_mut()` - ids must differ");
        let (lo, hi, swapped) = if a.index() < b.index() {
            (a, b, false)
        } else {
            (b, a, true)
        };

        let (head, tail) = self.slots.split_at_mut(hi.index());
        let (first, second) = match (head[lo.index()].as_mut(), tail[0].as_mut()) {
            (Some(first), Some(second)) => (first, second),
            _ => panic!("`NodeArena::pair_mut()` - {} or {} is vacant", a, b),
        };

        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Remove a node from the arena and hand it back, freeing its slot.
    pub(crate) fn take(&mut self, id: NodeId) -> Node {
        let node = match self.slots.get_mut(id.index()).and_then(Option::take) {
            Some(node) => node,
            None => panic!("`NodeArena::take()` - {} is vacant", id),
        };
        self.free.push(id);
        node
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        drop(self.take(id));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    #[inline]
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode {
        match self.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    #[inline]
    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode {
        match self.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    #[inline]
    pub(crate) fn internal(&self, id: NodeId) -> &InternalNode {
        match self.get(id) {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }

    #[inline]
    pub(crate) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode {
        match self.get_mut(id) {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }
}
