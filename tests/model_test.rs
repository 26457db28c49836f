//! Randomized comparison against `BTreeSet`.

use std::collections::BTreeSet;

use bplustree::BPlusTree;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Small key space so inserts and deletes collide often.
fn value_strategy() -> impl Strategy<Value = i32> {
    -500i32..500i32
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i32),
    Delete(i32),
    Search(i32),
    Range(i32, i32),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => value_strategy().prop_map(TreeOp::Insert),
        4 => value_strategy().prop_map(TreeOp::Delete),
        2 => value_strategy().prop_map(TreeOp::Search),
        1 => (value_strategy(), value_strategy()).prop_map(|(a, b)| TreeOp::Range(a, b)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays random operations on both structures and asserts identical
    /// results at every step, with the full invariant check after each
    /// mutation.
    #[test]
    fn tree_ops_match_btreeset(
        order in 3usize..=9,
        ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE),
    ) {
        let mut tree = BPlusTree::new(order).unwrap();
        let mut model: BTreeSet<i32> = BTreeSet::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(v) => {
                    prop_assert_eq!(tree.insert(v), model.insert(v), "insert({})", v);
                    prop_assert_eq!(tree.check(), Ok(()));
                }
                TreeOp::Delete(v) => {
                    prop_assert_eq!(tree.delete(v), model.remove(&v), "delete({})", v);
                    prop_assert_eq!(tree.check(), Ok(()));
                }
                TreeOp::Search(v) => {
                    prop_assert_eq!(tree.search(v), model.contains(&v), "search({})", v);
                }
                TreeOp::Range(lo, hi) => {
                    let got: Vec<i32> = tree.range(lo, hi).collect();
                    let expected: Vec<i32> = if lo <= hi {
                        model.range(lo..=hi).copied().collect()
                    } else {
                        Vec::new()
                    };
                    prop_assert_eq!(got, expected, "range({}, {})", lo, hi);
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert_eq!(tree.iter().collect::<Vec<_>>(), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(tree.min_key(), model.first().copied());
        prop_assert_eq!(tree.max_key(), model.last().copied());
    }

    /// Inserting any set of keys in any order yields the sorted set.
    #[test]
    fn insert_sorts_and_dedups(
        order in 3usize..=16,
        keys in proptest::collection::vec(any::<i32>(), 0..400),
    ) {
        let mut tree = BPlusTree::new(order).unwrap();
        tree.extend(keys.iter().copied());

        let model: BTreeSet<i32> = keys.into_iter().collect();
        prop_assert!(tree.validate());
        prop_assert_eq!(tree.iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }

    /// Deleting every key, in a random order, empties the tree back to a
    /// single root leaf.
    #[test]
    fn delete_everything(
        order in 3usize..=8,
        keys in proptest::collection::btree_set(-1_000i32..1_000, 1..300),
        seed in any::<u64>(),
    ) {
        let mut tree = BPlusTree::new(order).unwrap();
        tree.extend(keys.iter().copied());

        let mut doomed: Vec<i32> = keys.into_iter().collect();
        // Fisher-Yates driven by a simple LCG
        let mut x = seed;
        for i in (1..doomed.len()).rev() {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            doomed.swap(i, (x >> 33) as usize % (i + 1));
        }

        for key in doomed {
            prop_assert!(tree.delete(key));
            prop_assert!(tree.validate());
        }
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 1);
        prop_assert_eq!(tree.node_count(), 1);
    }
}
