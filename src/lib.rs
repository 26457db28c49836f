//! bplustree - An arena-backed B+ tree index over integer keys.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           bplustree                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Front End (cli/)                          │   │
//! │  │     Command (line grammar) → Session (tree + file)       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Index Layer (index/btree/)                │   │
//! │  │   BPlusTree: insert / delete / search / range / check    │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  NodeArena: Leaf | Internal, addressed by NodeId │   │   │
//! │  │   │       leaves linked left → right by NodeId       │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Storage Layer (storage/)                  │   │
//! │  │       codec (flat pre-order bytes) + snapshot files      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - The B+ tree itself
//! - [`storage`] - Snapshot encoding and files
//! - [`cli`] - Command parsing and sessions for the `bplustree` binary
//!
//! # Quick Start
//! ```no_run
//! use bplustree::BPlusTree;
//!
//! let mut tree = BPlusTree::new(4).unwrap();
//! tree.extend([5, 8, 1, 7, 3, 12, 9, 6]);
//! assert_eq!(tree.range(5, 9).collect::<Vec<_>>(), vec![5, 6, 7, 8, 9]);
//!
//! // Persist and read back
//! tree.save("tree_state.bin").unwrap();
//! let loaded = BPlusTree::load("tree_state.bin").unwrap();
//! assert!(loaded.contains(7));
//! ```

pub mod cli;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::DEFAULT_ORDER;
pub use common::{Error, NodeId, Result};

pub use cli::{Command, Session};
pub use index::btree::{BPlusTree, InvariantViolation, Key, LeafChain, RangeIter};
