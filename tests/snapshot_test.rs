//! Snapshot persistence across tree instances.

use std::fs;

use bplustree::storage::{codec, snapshot};
use bplustree::{BPlusTree, Error};
use proptest::prelude::*;
use tempfile::tempdir;

fn tree_with(order: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree {
    let mut tree = BPlusTree::new(order).unwrap();
    tree.extend(keys);
    tree
}

/// Test that a saved tree keeps working after reload: queries, range scans
/// over the rebuilt leaf chain, and further mutation.
#[test]
fn test_reload_then_mutate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.bin");

    // First session: build and save
    {
        let tree = tree_with(3, (0..300).map(|i| i * 2));
        snapshot::save(&tree, &path).unwrap();
    }

    // Second session: reload, verify, mutate, save
    {
        let mut tree = snapshot::load(&path).unwrap();
        assert_eq!(tree.order(), 3);
        assert_eq!(tree.len(), 300);
        assert_eq!(tree.range(10, 20).collect::<Vec<_>>(), vec![10, 12, 14, 16, 18, 20]);

        for key in 0..150 {
            tree.delete(key * 2);
        }
        tree.insert(1);
        assert!(tree.validate());
        tree.save(&path).unwrap();
    }

    // Third session: the mutations stuck
    {
        let tree = BPlusTree::load(&path).unwrap();
        assert_eq!(tree.len(), 151);
        assert_eq!(tree.min_key(), Some(1));
        assert_eq!(tree.max_key(), Some(598));
        assert!(tree.validate());
    }
}

#[test]
fn test_empty_tree_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.bin");

    BPlusTree::new(7).unwrap().save(&path).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 4 + 1 + 4);

    let tree = BPlusTree::load(&path).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.order(), 7);
}

#[test]
fn test_zero_order_header_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zero.bin");

    let mut bytes = codec::encode(&tree_with(4, 0..10));
    bytes[..4].copy_from_slice(&0i32.to_le_bytes());
    fs::write(&path, bytes).unwrap();

    assert!(matches!(BPlusTree::load(&path), Err(Error::CorruptData(_))));
}

#[test]
fn test_flipped_tag_rejected() {
    let mut bytes = codec::encode(&tree_with(4, 0..10));
    // Byte 4 is the root's tag; the root is internal here.
    assert_eq!(bytes[4], 0);
    bytes[4] = 1;
    assert!(matches!(codec::decode(&bytes), Err(Error::CorruptData(_))));
}

#[test]
fn test_every_truncation_rejected() {
    let bytes = codec::encode(&tree_with(3, 0..40));
    for len in 0..bytes.len() {
        assert!(
            matches!(codec::decode(&bytes[..len]), Err(Error::CorruptData(_))),
            "prefix of {} bytes decoded",
            len
        );
    }
    assert!(codec::decode(&bytes).is_ok());
}

#[test]
fn test_load_or_new_prefers_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.bin");

    tree_with(6, [1, 2, 3]).save(&path).unwrap();
    let tree = snapshot::load_or_new(&path, 3).unwrap();
    assert_eq!(tree.order(), 6);
    assert_eq!(tree.len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A decoded tree re-encodes to the same bytes and answers the same
    /// range queries.
    #[test]
    fn decode_preserves_tree(
        order in 3usize..=12,
        keys in proptest::collection::btree_set(any::<i32>(), 0..500),
        lo in any::<i32>(),
        hi in any::<i32>(),
    ) {
        let tree = tree_with(order, keys);
        let bytes = codec::encode(&tree);
        let decoded = codec::decode(&bytes).unwrap();

        prop_assert!(decoded.validate());
        prop_assert_eq!(codec::encode(&decoded), bytes);
        prop_assert_eq!(
            decoded.range(lo, hi).collect::<Vec<_>>(),
            tree.range(lo, hi).collect::<Vec<_>>()
        );
    }

    /// Arbitrary bytes either fail to decode or decode to a valid tree.
    #[test]
    fn decode_never_yields_invalid_tree(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(tree) = codec::decode(&bytes) {
            prop_assert!(tree.validate());
        }
    }
}
