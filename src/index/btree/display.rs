//! Human-readable dump of a tree. Diagnostic only; not a stable format.

use std::fmt;

use super::node::{Key, Node};
use super::BPlusTree;

struct Keys<'a>(&'a [Key]);

impl fmt::Display for Keys<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", key)?;
        }
        write!(f, "]")
    }
}

/// Renders the tree level by level, then the leaf chain:
///
/// ```text
/// B+ Tree (order 4, 8 keys, height 2)
/// Level 0: [5 7 9]
/// Level 1: [1 3] [5 6] [7 8] [9 12]
/// Leaf chain: [1 3] -> [5 6] -> [7 8] -> [9 12] -> NULL
/// ```
impl fmt::Display for BPlusTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "B+ Tree (order {}, {} keys, height {})",
            self.order,
            self.len,
            self.height()
        )?;

        let mut level = vec![self.root];
        let mut depth = 0;
        while !level.is_empty() {
            write!(f, "Level {}:", depth)?;
            let mut next_level = Vec::new();
            for &node_id in &level {
                let node = self.arena.get(node_id);
                write!(f, " {}", Keys(node.keys()))?;
                if let Node::Internal(internal) = node {
                    next_level.extend_from_slice(internal.children());
                }
            }
            writeln!(f)?;
            level = next_level;
            depth += 1;
        }

        write!(f, "Leaf chain: ")?;
        for keys in self.leaf_chain() {
            write!(f, "{} -> ", Keys(keys))?;
        }
        write!(f, "NULL")
    }
}
