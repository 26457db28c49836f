//! Snapshot files - a whole tree persisted through [`codec`](super::codec).
//!
//! A snapshot is written in one pass and read in one pass. There is no
//! incremental update: every save rewrites the file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::common::{Error, Result};
use crate::index::btree::BPlusTree;
use crate::storage::codec;

/// Write `tree` to `path`, replacing any existing file.
///
/// # Durability
/// The file is flushed and `fsync()`ed before returning.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be created or written. The tree
/// itself is never modified.
pub fn save<P: AsRef<Path>>(tree: &BPlusTree, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;

    let mut writer = BufWriter::new(file);
    codec::write_tree(tree, &mut writer)?;
    let file = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    file.sync_all()?;

    tracing::info!(path = %path.display(), keys = tree.len(), order = tree.order(), "snapshot saved");
    Ok(())
}

/// Read a tree back from `path`.
///
/// # Errors
/// - `Error::Io` if the file cannot be opened or read
/// - `Error::CorruptData` if its contents do not decode to a valid tree
pub fn load<P: AsRef<Path>>(path: P) -> Result<BPlusTree> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let tree = codec::read_tree(BufReader::new(file)).inspect_err(|e| {
        if let Error::CorruptData(reason) = e {
            tracing::warn!(path = %path.display(), reason = %reason, "snapshot rejected");
        }
    })?;

    tracing::info!(path = %path.display(), keys = tree.len(), order = tree.order(), "snapshot loaded");
    Ok(tree)
}

/// Load `path` if it exists, otherwise start an empty tree of `order`.
///
/// # Errors
/// Same as [`load`] for an existing file; `Error::InvalidOrder` when a fresh
/// tree is created with a bad `order`.
pub fn load_or_new<P: AsRef<Path>>(path: P, order: usize) -> Result<BPlusTree> {
    if path.as_ref().exists() {
        load(path)
    } else {
        BPlusTree::new(order)
    }
}

impl BPlusTree {
    /// Persist the tree to `path`. See [`snapshot::save`](save).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save(self, path)
    }

    /// Read a tree from `path`. See [`snapshot::load`](load).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load(path)
    }
}
