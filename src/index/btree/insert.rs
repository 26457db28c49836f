//! Insertion and node splitting.

use crate::common::config::max_keys;
use crate::common::NodeId;

use super::node::{InternalNode, Key, Node};
use super::BPlusTree;

/// What an insert into a subtree did, as seen by the parent.
enum Insertion {
    /// Key was already present; nothing changed.
    Duplicate,
    /// Key was added and the subtree root still fits.
    Inserted,
    /// Key was added and the subtree root split. The parent must take the
    /// separator and the new right sibling.
    Split(Key, NodeId),
}

impl BPlusTree {
    /// Insert `key`.
    ///
    /// Returns `false` if the key was already present, in which case the tree
    /// is left untouched.
    pub fn insert(&mut self, key: Key) -> bool {
        match self.insert_into(self.root, key) {
            Insertion::Duplicate => return false,
            Insertion::Inserted => {}
            Insertion::Split(separator, right) => self.grow_root(separator, right),
        }
        self.len += 1;
        true
    }

    fn insert_into(&mut self, node_id: NodeId, key: Key) -> Insertion {
        let max = max_keys(self.order);

        if self.arena.get(node_id).is_leaf() {
            let leaf = self.arena.leaf_mut(node_id);
            if !leaf.insert_key(key) {
                return Insertion::Duplicate;
            }
            if leaf.len() <= max {
                return Insertion::Inserted;
            }
            return self.split_leaf(node_id);
        }

        let internal = self.arena.internal(node_id);
        let index = internal.child_index(key);
        let child = internal.child(index);

        match self.insert_into(child, key) {
            Insertion::Split(separator, right) => {
                let parent = self.arena.internal_mut(node_id);
                parent.insert_child(index, separator, right);
                if parent.len() <= max {
                    Insertion::Inserted
                } else {
                    self.split_internal(node_id)
                }
            }
            outcome => outcome,
        }
    }

    /// Split an overfull leaf and splice the new sibling into the leaf chain.
    ///
    /// The separator handed to the parent is a copy of the sibling's first key.
    fn split_leaf(&mut self, leaf_id: NodeId) -> Insertion {
        let right = self.arena.leaf_mut(leaf_id).split_off();
        let separator = right.keys()[0];
        let right_id = self.arena.alloc(Node::Leaf(right));
        self.arena.leaf_mut(leaf_id).next = Some(right_id);

        tracing::trace!(left = %leaf_id, right = %right_id, separator, "split leaf");
        Insertion::Split(separator, right_id)
    }

    /// Split an overfull internal node; the median key moves up.
    fn split_internal(&mut self, node_id: NodeId) -> Insertion {
        let (separator, right) = self.arena.internal_mut(node_id).split_off();
        let right_id = self.arena.alloc(Node::Internal(right));

        tracing::trace!(left = %node_id, right = %right_id, separator, "split internal node");
        Insertion::Split(separator, right_id)
    }

    /// Put a new internal root above the old root and its new sibling.
    fn grow_root(&mut self, separator: Key, right: NodeId) {
        let old_root = self.root;
        let new_root = InternalNode::new(vec![separator], vec![old_root, right]);
        self.root = self.arena.alloc(Node::Internal(new_root));

        tracing::debug!(root = %self.root, separator, height = self.height(), "tree grew");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_keys(tree: &BPlusTree) -> Vec<Vec<Key>> {
        tree.leaf_chain().map(<[Key]>::to_vec).collect()
    }

    #[test]
    fn test_insert_into_empty_root() {
        let mut tree = BPlusTree::new(4).unwrap();
        assert!(tree.insert(10));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.arena.get(tree.root).keys(), &[10]);
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let mut tree = BPlusTree::new(4).unwrap();
        assert!(tree.insert(10));
        assert!(!tree.insert(10));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_root_leaf_split() {
        // Order 4: a leaf holds at most 3 keys; the 4th splits it 2 / 2.
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend([10, 20, 30, 40]);

        assert_eq!(tree.height(), 2);
        assert_eq!(tree.arena.internal(tree.root).keys(), &[30]);
        assert_eq!(leaf_keys(&tree), vec![vec![10, 20], vec![30, 40]]);
    }

    #[test]
    fn test_leaf_split_order_three() {
        // Order 3: 2 keys per leaf, a 3-key leaf splits 2 / 1.
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend([1, 2, 3]);

        assert_eq!(tree.arena.internal(tree.root).keys(), &[3]);
        assert_eq!(leaf_keys(&tree), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_internal_split_grows_height() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend(1..=7);

        assert_eq!(tree.height(), 3);
        assert!(tree.validate());
        assert_eq!(tree.iter().collect::<Vec<_>>(), (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_separator_is_first_key_of_right_leaf() {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend([5, 8, 1, 7, 3, 12, 9, 6]);

        let root = tree.arena.internal(tree.root);
        for (i, &separator) in root.keys().iter().enumerate() {
            assert_eq!(tree.subtree_min(root.child(i + 1)), Some(separator));
        }
    }

    #[test]
    fn test_descending_inserts() {
        let mut tree = BPlusTree::new(5).unwrap();
        tree.extend((0..200).rev());

        assert_eq!(tree.len(), 200);
        assert!(tree.validate());
        assert_eq!(tree.iter().collect::<Vec<_>>(), (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_boundary_keys() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend([i32::MAX, i32::MIN, 0, -1, 1]);

        assert!(tree.contains(i32::MIN));
        assert!(tree.contains(i32::MAX));
        assert_eq!(
            tree.iter().collect::<Vec<_>>(),
            vec![i32::MIN, -1, 0, 1, i32::MAX]
        );
    }
}
