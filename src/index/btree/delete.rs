//! Deletion with borrow-then-merge rebalancing.

use crate::common::config::min_keys;
use crate::common::NodeId;

use super::node::{Key, Node};
use super::BPlusTree;

impl BPlusTree {
    /// Remove `key`.
    ///
    /// Returns `false` if the key was not present, in which case the tree is
    /// left untouched.
    pub fn delete(&mut self, key: Key) -> bool {
        if !self.delete_from(self.root, key) {
            return false;
        }
        self.len -= 1;
        self.collapse_root();
        self.refresh_separators(key);
        true
    }

    /// Alias for [`delete`](Self::delete).
    #[inline]
    pub fn remove(&mut self, key: Key) -> bool {
        self.delete(key)
    }

    /// Delete `key` from the subtree rooted at `node_id`, fixing any child
    /// that underflows on the way back up.
    fn delete_from(&mut self, node_id: NodeId, key: Key) -> bool {
        if self.arena.get(node_id).is_leaf() {
            return self.arena.leaf_mut(node_id).remove_key(key);
        }

        let internal = self.arena.internal(node_id);
        let index = internal.child_index(key);
        let child = internal.child(index);

        if !self.delete_from(child, key) {
            return false;
        }

        if self.arena.get(child).len() < min_keys(self.order) {
            self.rebalance_child(node_id, index);
        }
        true
    }

    /// Restore minimum occupancy of `children[index]` of `parent_id`.
    ///
    /// Borrow from the left sibling, then the right sibling; merge only when
    /// neither can spare a key. Merges prefer the left sibling.
    fn rebalance_child(&mut self, parent_id: NodeId, index: usize) {
        let min = min_keys(self.order);
        let parent = self.arena.internal(parent_id);
        let left = (index > 0).then(|| parent.child(index - 1));
        let right = (index < parent.len()).then(|| parent.child(index + 1));

        if let Some(left) = left {
            if self.arena.get(left).len() > min {
                self.borrow_from_left(parent_id, index);
                return;
            }
        }
        if let Some(right) = right {
            if self.arena.get(right).len() > min {
                self.borrow_from_right(parent_id, index);
                return;
            }
        }

        if index > 0 {
            self.merge_children(parent_id, index - 1);
        } else {
            self.merge_children(parent_id, index);
        }
    }

    fn borrow_from_left(&mut self, parent_id: NodeId, index: usize) {
        let parent = self.arena.internal(parent_id);
        let (left_id, node_id) = (parent.child(index - 1), parent.child(index));
        let separator = parent.keys()[index - 1];

        let new_separator = match self.arena.pair_mut(left_id, node_id) {
            (Node::Leaf(left), Node::Leaf(node)) => node.borrow_from_left(left),
            (Node::Internal(left), Node::Internal(node)) => node.borrow_from_left(left, separator),
            _ => unreachable!("siblings {} and {} sit at different depths", left_id, node_id),
        };
        self.arena.internal_mut(parent_id).keys[index - 1] = new_separator;

        tracing::trace!(from = %left_id, to = %node_id, separator = new_separator, "borrowed from left sibling");
    }

    fn borrow_from_right(&mut self, parent_id: NodeId, index: usize) {
        let parent = self.arena.internal(parent_id);
        let (node_id, right_id) = (parent.child(index), parent.child(index + 1));
        let separator = parent.keys()[index];

        let new_separator = match self.arena.pair_mut(node_id, right_id) {
            (Node::Leaf(node), Node::Leaf(right)) => node.borrow_from_right(right),
            (Node::Internal(node), Node::Internal(right)) => node.borrow_from_right(right, separator),
            _ => unreachable!("siblings {} and {} sit at different depths", node_id, right_id),
        };
        self.arena.internal_mut(parent_id).keys[index] = new_separator;

        tracing::trace!(from = %right_id, to = %node_id, separator = new_separator, "borrowed from right sibling");
    }

    /// Merge `children[index + 1]` into `children[index]` and drop the
    /// separator between them from the parent.
    fn merge_children(&mut self, parent_id: NodeId, index: usize) {
        let left_id = self.arena.internal(parent_id).child(index);
        let (separator, right_id) = self.arena.internal_mut(parent_id).remove_child(index);
        let right = self.arena.take(right_id);

        match (self.arena.get_mut(left_id), right) {
            (Node::Leaf(left), Node::Leaf(right)) => left.merge(right),
            (Node::Internal(left), Node::Internal(right)) => left.merge(separator, right),
            _ => unreachable!("siblings {} and {} sit at different depths", left_id, right_id),
        }

        tracing::trace!(into = %left_id, absorbed = %right_id, separator, "merged siblings");
    }

    /// Replace an internal root left without separators by its only child.
    fn collapse_root(&mut self) {
        while let Node::Internal(root) = self.arena.get(self.root) {
            if !root.is_empty() {
                break;
            }
            let old_root = self.root;
            self.root = root.child(0);
            self.arena.free(old_root);

            tracing::debug!(root = %self.root, height = self.height(), "tree shrank");
        }
    }

    /// Rewrite separators that still carry a deleted key.
    ///
    /// A separator equals the smallest key of the subtree on its right, so a
    /// separator equal to a removed key sits on that key's search path.
    fn refresh_separators(&mut self, deleted: Key) {
        let mut node_id = self.root;
        while let Node::Internal(internal) = self.arena.get(node_id) {
            let index = internal.child_index(deleted);
            let child = internal.child(index);

            if index > 0 && internal.keys()[index - 1] == deleted {
                if let Some(min) = self.subtree_min(child) {
                    self.arena.internal_mut(node_id).keys[index - 1] = min;
                }
            }
            node_id = child;
        }
    }
}
