//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The tree handle: create, insert, delete, search, range
//! - [`RangeIter`] / [`LeafChain`] - Leaf-chain traversal
//! - [`InvariantViolation`] - What [`BPlusTree::check`] reports
//!
//! # Layout
//! Every node lives in an arena owned by the tree and is addressed by a
//! [`NodeId`](crate::NodeId). Internal nodes hold separator keys and child
//! ids; leaves hold keys and the id of the next leaf. The leaf chain is a
//! plain id field, so tearing the tree down never follows it.
//!
//! # Rebalancing
//! - Insert: a node reaching `order` keys splits. Leaves split at `⌈n/2⌉`
//!   and copy the right half's first key up; internal nodes split at `⌊n/2⌋`
//!   and move the median up. A root split grows the tree by one level.
//! - Delete: a non-root node falling below `(order - 1) / 2` keys borrows from
//!   its left sibling, else its right sibling, else merges (left first). An
//!   internal root left with no separators is replaced by its only child.

mod arena;
mod delete;
mod display;
mod insert;
mod iter;
mod node;
mod tree;
mod validate;

pub use iter::{LeafChain, RangeIter};
pub use node::Key;
pub use tree::BPlusTree;
pub use validate::InvariantViolation;

pub(crate) use arena::NodeArena;
pub(crate) use node::{InternalNode, LeafNode, Node};
