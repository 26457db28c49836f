//! Storage layer - snapshot encoding and files.
//!
//! This module handles persistent storage:
//! - [`codec`] - Byte layout of a serialized tree
//! - [`snapshot`] - Saving and loading whole trees on disk

pub mod codec;
pub mod snapshot;

pub use snapshot::{load, load_or_new, save};
