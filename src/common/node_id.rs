//! Node identifier type.

use std::fmt;

/// Identifies a node slot in the tree's node arena.
///
/// Parent→child ownership edges and the leaf chain are both stored as
/// `NodeId`s; an id is only meaningful for the arena that handed it out.
///
/// # Example
/// ```
/// use bplustree::NodeId;
///
/// let node_id = NodeId::new(42);
/// assert_eq!(node_id.index(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Build an id from an arena slot index.
    ///
    /// # Panics
    /// Panics if `index` doesn't fit in a `u32`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index)
            .unwrap_or_else(|_| panic!("node index {} exceeds u32::MAX", index));
        NodeId(raw)
    }

    /// Slot index inside the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
