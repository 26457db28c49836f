//! Snapshot codec - flat pre-order encoding of a whole tree.
//!
//! # Layout
//! All integers are 32-bit little-endian.
//! ```text
//! order:    i32
//! root:     Node
//!
//! Node := tag:      u8   (1 = leaf, 0 = internal)
//!         num_keys: i32
//!         keys:     num_keys × i32
//!         [internal only] children: (num_keys + 1) × Node
//! ```
//!
//! There is no checksum and no version field. Leaf-chain links are not
//! stored; decoding relinks the leaves in left-to-right order.

use std::io::{self, Read, Write};

use crate::common::config::{max_keys, MAX_HEIGHT, MAX_ORDER, MIN_ORDER};
use crate::common::{Error, NodeId, Result};
use crate::index::btree::{BPlusTree, InternalNode, Key, LeafNode, Node, NodeArena};

/// One-byte node discriminator.
///
/// Uses `#[repr(u8)]` to guarantee a 1-byte representation for serialization.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    Internal = 0,
    Leaf = 1,
}

impl NodeTag {
    /// Convert from u8, returning None for unknown values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(NodeTag::Internal),
            1 => Some(NodeTag::Leaf),
            _ => None,
        }
    }
}

// ============================================================================
// ENCODE
// ============================================================================

/// Encode a tree into a fresh byte buffer.
pub fn encode(tree: &BPlusTree) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + tree.node_count() * 5 + tree.len() * 4);
    put_i32(&mut buf, to_i32(tree.order()));
    encode_node(tree, tree.root, &mut buf);
    buf
}

/// Encode a tree into `writer`.
///
/// # Errors
/// Returns `Error::Io` if the writer fails.
pub fn write_tree<W: Write>(tree: &BPlusTree, mut writer: W) -> Result<()> {
    writer.write_all(&encode(tree))?;
    writer.flush()?;
    Ok(())
}

fn encode_node(tree: &BPlusTree, node_id: NodeId, buf: &mut Vec<u8>) {
    let node = tree.arena.get(node_id);
    let tag = if node.is_leaf() { NodeTag::Leaf } else { NodeTag::Internal };

    buf.push(tag as u8);
    put_i32(buf, to_i32(node.len()));
    for &key in node.keys() {
        put_i32(buf, key);
    }

    if let Node::Internal(internal) = node {
        for &child in internal.children() {
            encode_node(tree, child, buf);
        }
    }
}

#[inline]
fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Orders and key counts are bounded by `MAX_ORDER`, far below `i32::MAX`.
#[inline]
fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or_else(|_| panic!("{} does not fit the snapshot format", value))
}

// ============================================================================
// DECODE
// ============================================================================

/// Decode a tree from a complete byte buffer.
///
/// # Errors
/// Returns `Error::CorruptData` if the bytes are truncated, carry trailing
/// data, or describe a tree that breaks the B+ tree invariants.
pub fn decode(bytes: &[u8]) -> Result<BPlusTree> {
    read_tree(bytes)
}

/// Decode a tree from `reader`, which must be positioned at the order field
/// and end right after the last node.
///
/// Fails closed: no tree is returned unless the whole stream decodes and the
/// rebuilt tree passes validation.
///
/// # Errors
/// - `Error::CorruptData` for malformed or truncated input
/// - `Error::Io` for any other read failure
pub fn read_tree<R: Read>(reader: R) -> Result<BPlusTree> {
    let mut decoder = Decoder::new(reader);

    let raw_order = decoder.read_i32("order")?;
    let order = usize::try_from(raw_order)
        .ok()
        .filter(|order| (MIN_ORDER..=MAX_ORDER).contains(order))
        .ok_or_else(|| Error::corrupt(format!("order {} out of range", raw_order)))?;
    decoder.max_keys = max_keys(order);

    let root = decoder.read_node(0)?;
    decoder.expect_end()?;

    // Leaves come out of the pre-order walk left to right; chain them.
    for pair in decoder.leaves.windows(2) {
        decoder.arena.leaf_mut(pair[0]).next = Some(pair[1]);
    }

    let tree = BPlusTree::from_parts(order, root, decoder.arena, decoder.keys);
    tree.check()
        .map_err(|violation| Error::corrupt(violation.to_string()))?;

    Ok(tree)
}

/// Reader state for one decode.
struct Decoder<R> {
    reader: R,
    arena: NodeArena,
    leaves: Vec<NodeId>,
    keys: usize,
    max_keys: usize,
}

impl<R: Read> Decoder<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            arena: NodeArena::new(),
            leaves: Vec::new(),
            keys: 0,
            max_keys: 0,
        }
    }

    fn read_node(&mut self, depth: usize) -> Result<NodeId> {
        if depth >= MAX_HEIGHT {
            return Err(Error::corrupt(format!("nesting deeper than {} levels", MAX_HEIGHT)));
        }

        let raw_tag = self.read_u8("node tag")?;
        let tag = NodeTag::from_u8(raw_tag)
            .ok_or_else(|| Error::corrupt(format!("unknown node tag {}", raw_tag)))?;

        let raw_count = self.read_i32("key count")?;
        let count = usize::try_from(raw_count)
            .ok()
            .filter(|&count| count <= self.max_keys)
            .ok_or_else(|| {
                Error::corrupt(format!(
                    "key count {} outside 0..={}",
                    raw_count, self.max_keys
                ))
            })?;

        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            keys.push(self.read_i32("key")?);
        }

        match tag {
            NodeTag::Leaf => {
                self.keys += keys.len();
                let id = self.arena.alloc(Node::Leaf(LeafNode { keys, next: None }));
                self.leaves.push(id);
                Ok(id)
            }
            NodeTag::Internal => {
                if keys.is_empty() {
                    return Err(Error::corrupt("internal node without separators"));
                }
                let mut children = Vec::with_capacity(keys.len() + 1);
                for _ in 0..=keys.len() {
                    children.push(self.read_node(depth + 1)?);
                }
                Ok(self.arena.alloc(Node::Internal(InternalNode::new(keys, children))))
            }
        }
    }

    fn read_u8(&mut self, field: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, field)?;
        Ok(buf[0])
    }

    fn read_i32(&mut self, field: &str) -> Result<Key> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, field)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn fill(&mut self, buf: &mut [u8], field: &str) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::corrupt(format!("truncated while reading {}", field)),
            _ => Error::Io(e),
        })
    }

    fn expect_end(&mut self) -> Result<()> {
        let mut probe = [0u8; 1];
        loop {
            match self.reader.read(&mut probe) {
                Ok(0) => return Ok(()),
                Ok(_) => return Err(Error::corrupt("trailing bytes after root node")),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}
