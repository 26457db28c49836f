//! Configuration constants for the B+ tree.

/// Smallest order a tree can be created with.
///
/// With order 2 a leaf holds a single key, so a split would leave one half
/// empty. Order 3 is the first order where both halves of every split still
/// meet the minimum occupancy.
pub const MIN_ORDER: usize = 3;

/// Order used when the caller doesn't pick one.
pub const DEFAULT_ORDER: usize = 4;

/// Largest order accepted by [`BPlusTree::new`](crate::BPlusTree::new).
///
/// Orders above this are almost certainly a corrupt snapshot header rather
/// than a deliberate choice, and are rejected before anything is allocated.
pub const MAX_ORDER: usize = 65_536;

/// Deepest node nesting the snapshot decoder will follow.
///
/// A tree of order 3 over the whole `i32` key space is at most 32 levels
/// deep, so anything past this bound is malformed input.
pub const MAX_HEIGHT: usize = 64;

/// File name used for snapshots when no path is given.
pub const DEFAULT_SNAPSHOT_FILE: &str = "tree_state.bin";

/// Minimum number of keys a non-root node must keep for a given order.
///
/// Integer floor of `(order - 1) / 2`. A node holding fewer keys than this
/// has underflowed and must borrow from or merge with a sibling.
#[inline]
pub const fn min_keys(order: usize) -> usize {
    (order - 1) / 2
}

/// Maximum number of keys any node can hold for a given order.
#[inline]
pub const fn max_keys(order: usize) -> usize {
    order - 1
}
