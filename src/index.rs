//! An order-4 B-tree mapping cell values to posting lists of row
//! positions, with an optional uniqueness constraint.
//!
//! Every node holds up to three `(value, posting list)` pairs and up
//! to four children; leaves have no children. Insertion splits a full
//! node's *parent* pre-emptively on the way down (the classic
//! single-pass B-tree insert), promoting the median key. Removal never
//! rebalances for height or fill factor — see [`Node::remove`] for the
//! one structural repair it does perform, and why.

use std::cmp::Ordering;

use crate::value::Value;

const MAX_KEYS: usize = 3;
const MEDIAN_IDX: usize = MAX_KEYS / 2;

/// A row position stored as a posting-list entry, keyed by a cell value.
type Key = (Value, Vec<usize>);

#[derive(Debug, Clone)]
struct Node {
    keys: Vec<Key>,
    /// Empty for a leaf.
    children: Vec<Node>,
}

impl Node {
    fn leaf() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn is_full(&self) -> bool {
        self.keys.len() >= MAX_KEYS
    }

    fn index_of(&self, value: &Value) -> usize {
        self.keys
            .partition_point(|(k, _)| k.total_cmp(value) == Ordering::Less)
    }

    /// Splits the full child at `children[i]`, promoting its median
    /// key into `self` at position `i`.
    fn split_child(&mut self, i: usize) {
        let mut child = self.children.remove(i);
        debug_assert!(child.is_full());
        let median = child.keys.remove(MEDIAN_IDX);
        let right_keys = child.keys.split_off(MEDIAN_IDX);
        let right_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(MEDIAN_IDX + 1)
        };
        let right = Node {
            keys: right_keys,
            children: right_children,
        };
        self.children.insert(i, child);
        self.children.insert(i + 1, right);
        self.keys.insert(i, median);
    }

    fn insert_non_full(&mut self, value: Value, position: usize) {
        let mut idx = self.index_of(&value);
        if idx < self.keys.len() && self.keys[idx].0.total_cmp(&value) == Ordering::Equal {
            self.keys[idx].1.push(position);
            return;
        }
        if self.is_leaf() {
            self.keys.insert(idx, (value, vec![position]));
            return;
        }
        if self.children[idx].is_full() {
            self.split_child(idx);
            if self.keys[idx].0.total_cmp(&value) == Ordering::Equal {
                self.keys[idx].1.push(position);
                return;
            }
            if self.keys[idx].0.total_cmp(&value) == Ordering::Less {
                idx += 1;
            }
        }
        self.children[idx].insert_non_full(value, position);
    }

    fn search(&self, value: &Value) -> Vec<usize> {
        let idx = self.index_of(value);
        if idx < self.keys.len() && self.keys[idx].0.total_cmp(value) == Ordering::Equal {
            return self.keys[idx].1.clone();
        }
        if self.is_leaf() {
            Vec::new()
        } else {
            self.children[idx].search(value)
        }
    }

    /// Removes `position` from the posting list for `value`. If the
    /// posting list empties out and the key lived in an internal
    /// node, the two children that key separated are merged into one
    /// so that `children.len() == keys.len() + 1` keeps holding —
    /// without that merge every key to the right of the deleted one
    /// would resolve to the wrong child on the next search. This is a
    /// correctness repair, not a rebalance: the merged node is left
    /// as oversized as it ends up, by design (§4.2's Remove never
    /// restores a target fill factor).
    fn remove(&mut self, value: &Value, position: usize) {
        let idx = self.index_of(value);
        if idx < self.keys.len() && self.keys[idx].0.total_cmp(value) == Ordering::Equal {
            self.keys[idx].1.retain(|&p| p != position);
            if self.keys[idx].1.is_empty() {
                self.keys.remove(idx);
                if !self.is_leaf() {
                    let right = self.children.remove(idx + 1);
                    let left = &mut self.children[idx];
                    left.keys.extend(right.keys);
                    left.children.extend(right.children);
                }
            }
            return;
        }
        if !self.is_leaf() {
            self.children[idx].remove(value, position);
        }
    }
}

/// A B-tree index over one column, optionally uniqueness-enforcing.
#[derive(Debug, Clone)]
pub struct BTreeIndex {
    root: Node,
    unique: bool,
}

/// Raised when a uniqueness-enforcing insert finds an existing row
/// already holding the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey;

impl BTreeIndex {
    #[must_use]
    pub fn new(unique: bool) -> Self {
        Self {
            root: Node::leaf(),
            unique,
        }
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// Inserts `position` under `value`. Fails without mutating the
    /// index if this is a unique index, `value` is non-null, and a
    /// row is already posted under it — multiple nulls are always
    /// allowed in a unique index (§3's I1 excludes null from the
    /// uniqueness multiset).
    pub fn insert(&mut self, value: Value, position: usize) -> Result<(), DuplicateKey> {
        if self.unique && !value.is_null() && !self.root.search(&value).is_empty() {
            return Err(DuplicateKey);
        }
        if self.root.is_full() {
            let old_root = std::mem::replace(&mut self.root, Node::leaf());
            let mut new_root = Node {
                keys: Vec::new(),
                children: vec![old_root],
            };
            new_root.split_child(0);
            self.root = new_root;
        }
        self.root.insert_non_full(value, position);
        Ok(())
    }

    /// Returns a snapshot of the posting list for `value` — a copy,
    /// so later mutations of the index can't invalidate a caller
    /// still iterating a prior search's result.
    #[must_use]
    pub fn search(&self, value: &Value) -> Vec<usize> {
        self.root.search(value)
    }

    pub fn remove(&mut self, value: &Value, position: usize) {
        self.root.remove(value, position);
    }

    /// Discards the current tree and re-inserts every pair from
    /// scratch, in order. Used by the DELETE path to restore (I2)
    /// after row positions shift (§4.5).
    pub fn rebuild(&mut self, pairs: impl IntoIterator<Item = (Value, usize)>) {
        self.root = Node::leaf();
        for (value, position) in pairs {
            // Uniqueness was already enforced when this data entered
            // the table; re-validating here would be redundant and
            // is skipped so a rebuild can never itself fail.
            self.root.insert_non_full(value, position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_after_four_inserts() {
        let mut idx = BTreeIndex::new(false);
        for i in 0..4 {
            idx.insert(Value::Integer(i), i as usize).unwrap();
        }
        assert!(!idx.root.is_leaf());
    }

    #[test]
    fn search_finds_all_inserted_values() {
        let mut idx = BTreeIndex::new(false);
        for i in 0..50 {
            idx.insert(Value::Integer(i), i as usize).unwrap();
        }
        for i in 0..50 {
            assert_eq!(idx.search(&Value::Integer(i)), vec![i as usize]);
        }
        assert!(idx.search(&Value::Integer(999)).is_empty());
    }

    #[test]
    fn unique_index_rejects_duplicate_non_null() {
        let mut idx = BTreeIndex::new(true);
        idx.insert(Value::Integer(1), 0).unwrap();
        assert_eq!(idx.insert(Value::Integer(1), 1), Err(DuplicateKey));
    }

    #[test]
    fn unique_index_allows_multiple_nulls() {
        let mut idx = BTreeIndex::new(true);
        idx.insert(Value::Null, 0).unwrap();
        idx.insert(Value::Null, 1).unwrap();
        assert_eq!(idx.search(&Value::Null).len(), 2);
    }

    #[test]
    fn non_unique_index_accumulates_posting_list() {
        let mut idx = BTreeIndex::new(false);
        idx.insert(Value::Text("a".into()), 0).unwrap();
        idx.insert(Value::Text("a".into()), 1).unwrap();
        idx.insert(Value::Text("a".into()), 2).unwrap();
        assert_eq!(idx.search(&Value::Text("a".into())), vec![0, 1, 2]);
    }

    #[test]
    fn remove_then_search_is_empty() {
        let mut idx = BTreeIndex::new(false);
        for i in 0..20 {
            idx.insert(Value::Integer(i), i as usize).unwrap();
        }
        idx.remove(&Value::Integer(10), 10);
        assert!(idx.search(&Value::Integer(10)).is_empty());
        // Neighboring keys still resolve correctly after the merge
        // `remove` performs when it empties an internal-node posting.
        for i in 0..20 {
            if i != 10 {
                assert_eq!(idx.search(&Value::Integer(i)), vec![i as usize]);
            }
        }
    }

    #[test]
    fn rebuild_replaces_the_tree() {
        let mut idx = BTreeIndex::new(true);
        for i in 0..30 {
            idx.insert(Value::Integer(i), i as usize).unwrap();
        }
        idx.rebuild((0..10).map(|i| (Value::Integer(i), i as usize)));
        assert!(idx.search(&Value::Integer(20)).is_empty());
        for i in 0..10 {
            assert_eq!(idx.search(&Value::Integer(i)), vec![i as usize]);
        }
    }

    #[test]
    fn large_sequential_insert_preserves_all_postings() {
        let mut idx = BTreeIndex::new(false);
        for i in 0..1000 {
            idx.insert(Value::Integer(i), i as usize).unwrap();
        }
        for i in 0..1000 {
            assert_eq!(idx.search(&Value::Integer(i)), vec![i as usize]);
        }
    }
}
