//! Leaf-chain iterators.

use std::iter::FusedIterator;

use crate::common::NodeId;

use super::arena::NodeArena;
use super::node::Key;

/// Ascending iterator over keys in `[low, high]`.
///
/// Created by [`BPlusTree::range`](super::BPlusTree::range) and
/// [`BPlusTree::iter`](super::BPlusTree::iter). Walks the leaf chain and stops
/// at the first key past `high`.
#[derive(Debug, Clone)]
pub struct RangeIter<'a> {
    arena: &'a NodeArena,
    leaf: Option<NodeId>,
    /// Position of the next key inside `leaf`.
    pos: usize,
    high: Key,
}

impl<'a> RangeIter<'a> {
    pub(crate) fn new(arena: &'a NodeArena, leaf: NodeId, pos: usize, high: Key) -> Self {
        Self {
            arena,
            leaf: Some(leaf),
            pos,
            high,
        }
    }

    pub(crate) fn empty(arena: &'a NodeArena) -> Self {
        Self {
            arena,
            leaf: None,
            pos: 0,
            high: Key::MIN,
        }
    }
}

impl Iterator for RangeIter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            let leaf = self.arena.leaf(self.leaf?);
            match leaf.keys().get(self.pos) {
                Some(&key) if key > self.high => {
                    self.leaf = None;
                    return None;
                }
                Some(&key) => {
                    self.pos += 1;
                    return Some(key);
                }
                None => {
                    self.leaf = leaf.next();
                    self.pos = 0;
                }
            }
        }
    }
}

impl FusedIterator for RangeIter<'_> {}

/// Iterator over the leaves in chain order, yielding each leaf's keys.
#[derive(Debug, Clone)]
pub struct LeafChain<'a> {
    arena: &'a NodeArena,
    leaf: Option<NodeId>,
}

impl<'a> LeafChain<'a> {
    pub(crate) fn new(arena: &'a NodeArena, first: NodeId) -> Self {
        Self {
            arena,
            leaf: Some(first),
        }
    }
}

impl<'a> Iterator for LeafChain<'a> {
    type Item = &'a [Key];

    fn next(&mut self) -> Option<&'a [Key]> {
        let arena = self.arena;
        let leaf = arena.leaf(self.leaf?);
        self.leaf = leaf.next();
        Some(leaf.keys())
    }
}

impl FusedIterator for LeafChain<'_> {}
