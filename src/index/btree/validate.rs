//! Structural invariant checks.
//!
//! Not used on any hot path: tests and the snapshot decoder call these to
//! confirm a tree is well formed.

use thiserror::Error;

use crate::common::config::{max_keys, min_keys};
use crate::common::NodeId;

use super::node::{Key, Node};
use super::BPlusTree;

/// The first broken invariant found by [`BPlusTree::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{node}: keys are not strictly ascending")]
    KeysOutOfOrder { node: NodeId },

    #[error("{node}: holds {len} keys, at most {max} allowed")]
    Overfull { node: NodeId, len: usize, max: usize },

    #[error("{node}: holds {len} keys, at least {min} required")]
    Underfull { node: NodeId, len: usize, min: usize },

    #[error("{node}: {keys} separators but {children} children")]
    ChildCount {
        node: NodeId,
        keys: usize,
        children: usize,
    },

    #[error("root {node} is internal with no separators")]
    EmptyInternalRoot { node: NodeId },

    #[error("{node}: leaf at depth {depth}, expected {expected}")]
    UnevenDepth {
        node: NodeId,
        depth: usize,
        expected: usize,
    },

    #[error("{node}: key {key} lies outside the range its parent assigns")]
    KeyOutOfRange { node: NodeId, key: Key },

    #[error("{node}: separator {index} is {separator}, right subtree starts at {subtree_min:?}")]
    SeparatorMismatch {
        node: NodeId,
        index: usize,
        separator: Key,
        subtree_min: Option<Key>,
    },

    #[error("leaf chain diverges from tree order at leaf {position}")]
    BrokenLeafChain { position: usize },

    #[error("tree records {recorded} keys but holds {counted}")]
    LengthMismatch { recorded: usize, counted: usize },

    #[error("{reachable} nodes reachable from the root but {allocated} allocated")]
    LeakedNodes { reachable: usize, allocated: usize },
}

/// Accumulated state of one validation walk.
struct Walk {
    leaf_depth: Option<usize>,
    /// Leaves in left-to-right tree order.
    leaves: Vec<NodeId>,
    keys: usize,
    nodes: usize,
}

impl BPlusTree {
    /// Returns true if every structural invariant holds.
    pub fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Check every structural invariant, reporting the first violation.
    ///
    /// - keys strictly ascending inside each node and across the tree
    /// - key counts within `[min_keys, order - 1]` for every non-root node
    /// - all leaves at the same depth
    /// - each separator equal to the smallest key of the subtree to its right
    /// - the leaf chain visits every leaf in tree order
    pub fn check(&self) -> Result<(), InvariantViolation> {
        if let Node::Internal(root) = self.arena.get(self.root) {
            if root.is_empty() {
                return Err(InvariantViolation::EmptyInternalRoot { node: self.root });
            }
        }

        let mut walk = Walk {
            leaf_depth: None,
            leaves: Vec::new(),
            keys: 0,
            nodes: 0,
        };
        self.check_node(self.root, 0, None, None, &mut walk)?;

        if walk.keys != self.len {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len,
                counted: walk.keys,
            });
        }
        if walk.nodes != self.arena.len() {
            return Err(InvariantViolation::LeakedNodes {
                reachable: walk.nodes,
                allocated: self.arena.len(),
            });
        }

        self.check_leaf_chain(&walk.leaves)
    }

    /// Validate the subtree at `node_id` whose keys must lie in
    /// `[lower, upper)`. Returns the smallest key in the subtree.
    fn check_node(
        &self,
        node_id: NodeId,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
        walk: &mut Walk,
    ) -> Result<Option<Key>, InvariantViolation> {
        walk.nodes += 1;
        let node = self.arena.get(node_id);
        let keys = node.keys();

        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InvariantViolation::KeysOutOfOrder { node: node_id });
        }
        let max = max_keys(self.order);
        if keys.len() > max {
            return Err(InvariantViolation::Overfull {
                node: node_id,
                len: keys.len(),
                max,
            });
        }
        let min = min_keys(self.order);
        if node_id != self.root && keys.len() < min {
            return Err(InvariantViolation::Underfull {
                node: node_id,
                len: keys.len(),
                min,
            });
        }
        if let Some(&key) = keys
            .iter()
            .find(|&&k| lower.is_some_and(|lo| k < lo) || upper.is_some_and(|hi| k >= hi))
        {
            return Err(InvariantViolation::KeyOutOfRange { node: node_id, key });
        }

        match node {
            Node::Leaf(leaf) => {
                let expected = *walk.leaf_depth.get_or_insert(depth);
                if depth != expected {
                    return Err(InvariantViolation::UnevenDepth {
                        node: node_id,
                        depth,
                        expected,
                    });
                }
                walk.leaves.push(node_id);
                walk.keys += leaf.len();
                Ok(leaf.keys().first().copied())
            }
            Node::Internal(internal) => {
                if internal.children().len() != internal.len() + 1 {
                    return Err(InvariantViolation::ChildCount {
                        node: node_id,
                        keys: internal.len(),
                        children: internal.children().len(),
                    });
                }

                let mut subtree_min = None;
                for (i, &child) in internal.children().iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(internal.keys()[i - 1]) };
                    let child_upper = internal.keys().get(i).copied().or(upper);
                    let child_min = self.check_node(child, depth + 1, child_lower, child_upper, walk)?;

                    if i == 0 {
                        subtree_min = child_min;
                    } else if child_min != Some(internal.keys()[i - 1]) {
                        return Err(InvariantViolation::SeparatorMismatch {
                            node: node_id,
                            index: i - 1,
                            separator: internal.keys()[i - 1],
                            subtree_min: child_min,
                        });
                    }
                }
                Ok(subtree_min)
            }
        }
    }

    /// Follow `next` links from the first leaf and compare against tree order.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<(), InvariantViolation> {
        let mut current = leaves.first().copied();
        let mut previous_key: Option<Key> = None;

        for (position, &expected) in leaves.iter().enumerate() {
            if current != Some(expected) {
                return Err(InvariantViolation::BrokenLeafChain { position });
            }
            let leaf = self.arena.leaf(expected);
            if let (Some(prev), Some(&first)) = (previous_key, leaf.keys().first()) {
                if first <= prev {
                    return Err(InvariantViolation::BrokenLeafChain { position });
                }
            }
            previous_key = leaf.keys().last().copied().or(previous_key);
            current = leaf.next();
        }

        if current.is_some() {
            return Err(InvariantViolation::BrokenLeafChain {
                position: leaves.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::btree::node::LeafNode;

    fn sample() -> BPlusTree {
        let mut tree = BPlusTree::new(4).unwrap();
        tree.extend([5, 8, 1, 7, 3, 12, 9, 6]);
        tree
    }

    #[test]
    fn test_valid_trees_pass() {
        assert!(BPlusTree::new(3).unwrap().validate());
        assert_eq!(sample().check(), Ok(()));
    }

    #[test]
    fn test_detects_unordered_keys() {
        let mut tree = sample();
        let leaf = tree.first_leaf();
        tree.arena.leaf_mut(leaf).keys.reverse();
        assert_eq!(
            tree.check(),
            Err(InvariantViolation::KeysOutOfOrder { node: leaf })
        );
    }

    #[test]
    fn test_detects_stale_separator() {
        let mut tree = sample();
        let root = tree.root;
        let original = tree.arena.internal(root).keys()[0];
        tree.arena.internal_mut(root).keys[0] = original - 1;
        assert!(matches!(
            tree.check(),
            Err(InvariantViolation::SeparatorMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_detects_broken_leaf_chain() {
        let mut tree = sample();
        let first = tree.first_leaf();
        tree.arena.leaf_mut(first).next = None;
        assert!(matches!(
            tree.check(),
            Err(InvariantViolation::BrokenLeafChain { position: 1 })
        ));
    }

    #[test]
    fn test_detects_underfull_leaf() {
        let mut tree = sample();
        let last = tree.arena.internal(tree.root).children().last().copied().unwrap();
        let removed = tree.arena.leaf_mut(last).keys.drain(..).count();
        tree.len -= removed;
        assert!(matches!(
            tree.check(),
            Err(InvariantViolation::Underfull { .. }) | Err(InvariantViolation::SeparatorMismatch { .. })
        ));
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut tree = sample();
        tree.len += 1;
        assert!(matches!(
            tree.check(),
            Err(InvariantViolation::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_detects_leaked_node() {
        let mut tree = sample();
        tree.arena.alloc(Node::Leaf(LeafNode::new()));
        assert!(matches!(
            tree.check(),
            Err(InvariantViolation::LeakedNodes { .. })
        ));
    }

    #[test]
    fn test_detects_empty_internal_root() {
        let mut tree = sample();
        let root = tree.root;
        tree.arena.internal_mut(root).keys.clear();
        assert_eq!(
            tree.check(),
            Err(InvariantViolation::EmptyInternalRoot { node: root })
        );
    }

    #[test]
    fn test_violation_display() {
        let err = InvariantViolation::Overfull {
            node: NodeId::new(3),
            len: 4,
            max: 3,
        };
        assert_eq!(err.to_string(), "Node(3): holds 4 keys, at most 3 allowed");
    }
}
