//! AVL tree engine
//!
//! One generic engine shared by every secondary index.

use std::cmp::Ordering;
use std::io::Write;

use crate::bucket::DuplicateBucket;
use crate::error::{MenagerieError, Result};
use crate::RowId;

use super::iter::Iter;
use super::IndexKey;

/// Arena position of a node
pub(super) type NodeId = usize;

/// A tree node
#[derive(Debug, Clone)]
pub(super) struct Node<K> {
    pub(super) key: K,

    /// height(right) - height(left), always in -1..=1 between operations
    pub(super) balance: i8,

    pub(super) left: Option<NodeId>,
    pub(super) right: Option<NodeId>,

    /// Row identifiers sharing `key`; never empty while the node exists
    pub(super) bucket: DuplicateBucket,
}

/// Secondary index over a record store
///
/// ## Invariants
/// - BST order on keys, no two nodes with equal keys
/// - `|height(left) - height(right)| <= 1` at every node
/// - Every node's bucket is non-empty
#[derive(Debug, Clone)]
pub struct OrderedIndex<K> {
    /// Node arena (`None` marks a free position)
    nodes: Vec<Option<Node<K>>>,

    /// Recyclable arena positions
    free: Vec<NodeId>,

    root: Option<NodeId>,

    /// Number of live nodes (distinct keys)
    len: usize,
}

impl<K: IndexKey> OrderedIndex<K> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Register `row` under `key`
    ///
    /// An existing key gets `row` appended to its bucket and the shape of
    /// the tree does not change.
    pub fn add(&mut self, key: K, row: RowId) {
        let (root, _) = self.insert_at(self.root, key, row);
        self.root = Some(root);
    }

    /// Remove `row` from the bucket of `key`
    ///
    /// Every occurrence of `row` in the bucket goes. The node is deleted
    /// once its bucket is empty. Returns true when something was removed.
    pub fn remove(&mut self, key: &K, row: RowId) -> bool {
        let mut removed = false;
        let (root, _) = self.delete_at(self.root, key, row, &mut removed);
        self.root = root;
        removed
    }

    /// Copy of the bucket stored under `key`, empty on a miss
    pub fn search(&self, key: &K) -> DuplicateBucket {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Borrow the bucket stored under `key`
    pub fn get(&self, key: &K) -> Option<&DuplicateBucket> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match key.compare(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(&node.bucket),
            };
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Row identifiers of every key in `[lo, hi]`, ascending key order
    ///
    /// Empty when `lo > hi`.
    pub fn search_in_range(&self, lo: &K, hi: &K) -> DuplicateBucket {
        let mut result = DuplicateBucket::new();
        if lo.compare(hi) == Ordering::Greater {
            return result;
        }
        self.collect_range(self.root, lo, hi, &mut result);
        result
    }

    /// Row identifiers of every key, ascending key order
    pub fn all_indices(&self) -> DuplicateBucket {
        let mut result = DuplicateBucket::new();
        for (_, bucket) in self.iter() {
            result.extend_from(bucket);
        }
        result
    }

    /// Discard the whole tree
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// `(key, bucket)` pairs in ascending key order
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Smallest key
    pub fn first_key(&self) -> Option<&K> {
        let mut id = self.root?;
        while let Some(left) = self.node(id).left {
            id = left;
        }
        Some(&self.node(id).key)
    }

    /// Largest key
    pub fn last_key(&self) -> Option<&K> {
        let mut id = self.root?;
        while let Some(right) = self.node(id).right {
            id = right;
        }
        Some(&self.node(id).key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Write a sideways dump of the tree to `out`
    ///
    /// The right subtree is printed above its parent, the left below; each
    /// level is indented by eight spaces and marked with one `<` per level.
    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.root {
            None => writeln!(out, "[empty tree]")?,
            Some(root) => self.print_node(root, out, "", 1)?,
        }
        Ok(())
    }

    /// Verify BST order, balance factors, heights and buckets
    pub fn check_invariants(&self) -> Result<()> {
        let mut count = 0;
        self.check_node(self.root, &mut count)?;
        if count != self.len {
            return Err(MenagerieError::Invariant(format!(
                "len {} but {} reachable nodes",
                self.len, count
            )));
        }

        let mut previous: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(prev) = previous {
                if prev.compare(key) != Ordering::Less {
                    return Err(MenagerieError::Invariant(format!(
                        "keys out of order: {} before {}",
                        prev, key
                    )));
                }
            }
            previous = Some(key);
        }

        Ok(())
    }

    // =========================================================================
    // Crate-visible accessors (iterator support)
    // =========================================================================

    pub(super) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(super) fn node(&self, id: NodeId) -> &Node<K> {
        match self.nodes.get(id).and_then(Option::as_ref) {
            Some(node) => node,
            None => unreachable!("dangling node id {}", id),
        }
    }

    // =========================================================================
    // Arena
    // =========================================================================

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.nodes.get_mut(id).and_then(Option::as_mut) {
            Some(node) => node,
            None => unreachable!("dangling node id {}", id),
        }
    }

    fn alloc(&mut self, key: K, row: RowId) -> NodeId {
        let node = Node {
            key,
            balance: 0,
            left: None,
            right: None,
            bucket: DuplicateBucket::with_value(row),
        };
        self.len += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K> {
        match self.nodes.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                self.len -= 1;
                node
            }
            None => unreachable!("double free of node id {}", id),
        }
    }

    fn left_of(&self, id: NodeId) -> NodeId {
        match self.node(id).left {
            Some(left) => left,
            None => unreachable!("node {} has no left child", id),
        }
    }

    fn right_of(&self, id: NodeId) -> NodeId {
        match self.node(id).right {
            Some(right) => right,
            None => unreachable!("node {} has no right child", id),
        }
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert below `at`; returns the subtree root and whether it grew
    fn insert_at(&mut self, at: Option<NodeId>, key: K, row: RowId) -> (NodeId, bool) {
        let Some(id) = at else {
            return (self.alloc(key, row), true);
        };

        match key.compare(&self.node(id).key) {
            Ordering::Less => {
                let left = self.node(id).left;
                let (child, grew) = self.insert_at(left, key, row);
                self.node_mut(id).left = Some(child);
                if !grew {
                    return (id, false);
                }
                match self.node(id).balance {
                    1 => {
                        self.node_mut(id).balance = 0;
                        (id, false)
                    }
                    0 => {
                        self.node_mut(id).balance = -1;
                        (id, true)
                    }
                    _ => (self.fix_left_heavy(id).0, false),
                }
            }
            Ordering::Greater => {
                let right = self.node(id).right;
                let (child, grew) = self.insert_at(right, key, row);
                self.node_mut(id).right = Some(child);
                if !grew {
                    return (id, false);
                }
                match self.node(id).balance {
                    -1 => {
                        self.node_mut(id).balance = 0;
                        (id, false)
                    }
                    0 => {
                        self.node_mut(id).balance = 1;
                        (id, true)
                    }
                    _ => (self.fix_right_heavy(id).0, false),
                }
            }
            Ordering::Equal => {
                self.node_mut(id).bucket.add(row);
                (id, false)
            }
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete below `at`; returns the new subtree root and whether it shrank
    fn delete_at(
        &mut self,
        at: Option<NodeId>,
        key: &K,
        row: RowId,
        removed: &mut bool,
    ) -> (Option<NodeId>, bool) {
        let Some(id) = at else {
            return (None, false);
        };

        match key.compare(&self.node(id).key) {
            Ordering::Less => {
                let left = self.node(id).left;
                let (child, shrunk) = self.delete_at(left, key, row, removed);
                self.node_mut(id).left = child;
                if shrunk {
                    let (root, shrunk) = self.left_shrunk(id);
                    (Some(root), shrunk)
                } else {
                    (Some(id), false)
                }
            }
            Ordering::Greater => {
                let right = self.node(id).right;
                let (child, shrunk) = self.delete_at(right, key, row, removed);
                self.node_mut(id).right = child;
                if shrunk {
                    let (root, shrunk) = self.right_shrunk(id);
                    (Some(root), shrunk)
                } else {
                    (Some(id), false)
                }
            }
            Ordering::Equal => {
                let bucket = &mut self.node_mut(id).bucket;
                if !bucket.contains(row) {
                    return (Some(id), false);
                }
                bucket.remove_all(row);
                *removed = true;
                if !bucket.is_empty() {
                    return (Some(id), false);
                }
                self.unlink_node(id)
            }
        }
    }

    /// Remove node `id` from its position; returns the replacement subtree
    fn unlink_node(&mut self, id: NodeId) -> (Option<NodeId>, bool) {
        let node = self.node(id);
        match (node.left, node.right) {
            (Some(left), Some(_)) => {
                // Take over the in-order predecessor's key and bucket
                let (new_left, pred, shrunk) = self.detach_max(left);
                self.node_mut(id).left = new_left;
                let pred = self.release(pred);
                let target = self.node_mut(id);
                target.key = pred.key;
                target.bucket = pred.bucket;

                if shrunk {
                    let (root, shrunk) = self.left_shrunk(id);
                    (Some(root), shrunk)
                } else {
                    (Some(id), false)
                }
            }
            (child, None) | (None, child) => {
                self.release(id);
                (child, true)
            }
        }
    }

    /// Cut the rightmost node out of the subtree at `id`
    ///
    /// Returns the new subtree root, the detached node (still allocated) and
    /// whether the subtree shrank.
    fn detach_max(&mut self, id: NodeId) -> (Option<NodeId>, NodeId, bool) {
        match self.node(id).right {
            None => (self.node(id).left, id, true),
            Some(right) => {
                let (new_right, max, shrunk) = self.detach_max(right);
                self.node_mut(id).right = new_right;
                if shrunk {
                    let (root, shrunk) = self.right_shrunk(id);
                    (Some(root), max, shrunk)
                } else {
                    (Some(id), max, false)
                }
            }
        }
    }

    /// The left subtree of `id` lost one level
    fn left_shrunk(&mut self, id: NodeId) -> (NodeId, bool) {
        match self.node(id).balance {
            -1 => {
                self.node_mut(id).balance = 0;
                (id, true)
            }
            0 => {
                self.node_mut(id).balance = 1;
                (id, false)
            }
            _ => self.fix_right_heavy(id),
        }
    }

    /// The right subtree of `id` lost one level
    fn right_shrunk(&mut self, id: NodeId) -> (NodeId, bool) {
        match self.node(id).balance {
            1 => {
                self.node_mut(id).balance = 0;
                (id, true)
            }
            0 => {
                self.node_mut(id).balance = -1;
                (id, false)
            }
            _ => self.fix_left_heavy(id),
        }
    }

    // =========================================================================
    // Rebalancing
    // =========================================================================

    /// Restore balance at `a`, whose left side is two levels taller
    ///
    /// Returns the new subtree root and whether the subtree is now one level
    /// lower than before the imbalance (always the case after an insert).
    fn fix_left_heavy(&mut self, a: NodeId) -> (NodeId, bool) {
        let b = self.left_of(a);
        let result = match self.node(b).balance {
            // Left-left
            -1 => {
                let root = self.rotate_right(a);
                self.node_mut(a).balance = 0;
                self.node_mut(b).balance = 0;
                (root, true)
            }
            // Left-left with an even child: only reachable on delete
            0 => {
                let root = self.rotate_right(a);
                self.node_mut(a).balance = -1;
                self.node_mut(b).balance = 1;
                (root, false)
            }
            // Left-right
            _ => {
                let c = self.right_of(b);
                let c_balance = self.node(c).balance;
                let new_left = self.rotate_left(b);
                self.node_mut(a).left = Some(new_left);
                let root = self.rotate_right(a);
                self.node_mut(a).balance = if c_balance == -1 { 1 } else { 0 };
                self.node_mut(b).balance = if c_balance == 1 { -1 } else { 0 };
                self.node_mut(c).balance = 0;
                (root, true)
            }
        };
        debug_assert!(self.node(result.0).balance.abs() <= 1);
        result
    }

    /// Restore balance at `a`, whose right side is two levels taller
    fn fix_right_heavy(&mut self, a: NodeId) -> (NodeId, bool) {
        let b = self.right_of(a);
        let result = match self.node(b).balance {
            // Right-right
            1 => {
                let root = self.rotate_left(a);
                self.node_mut(a).balance = 0;
                self.node_mut(b).balance = 0;
                (root, true)
            }
            // Right-right with an even child: only reachable on delete
            0 => {
                let root = self.rotate_left(a);
                self.node_mut(a).balance = 1;
                self.node_mut(b).balance = -1;
                (root, false)
            }
            // Right-left
            _ => {
                let c = self.left_of(b);
                let c_balance = self.node(c).balance;
                let new_right = self.rotate_right(b);
                self.node_mut(a).right = Some(new_right);
                let root = self.rotate_left(a);
                self.node_mut(a).balance = if c_balance == 1 { -1 } else { 0 };
                self.node_mut(b).balance = if c_balance == -1 { 1 } else { 0 };
                self.node_mut(c).balance = 0;
                (root, true)
            }
        };
        debug_assert!(self.node(result.0).balance.abs() <= 1);
        result
    }

    /// Pointer-only left rotation; balance factors are set by the caller
    fn rotate_left(&mut self, a: NodeId) -> NodeId {
        let b = self.right_of(a);
        let inner = self.node(b).left;
        self.node_mut(a).right = inner;
        self.node_mut(b).left = Some(a);
        b
    }

    /// Pointer-only right rotation; balance factors are set by the caller
    fn rotate_right(&mut self, a: NodeId) -> NodeId {
        let b = self.left_of(a);
        let inner = self.node(b).right;
        self.node_mut(a).left = inner;
        self.node_mut(b).right = Some(a);
        b
    }

    // =========================================================================
    // Traversal Helpers
    // =========================================================================

    fn collect_range(&self, at: Option<NodeId>, lo: &K, hi: &K, out: &mut DuplicateBucket) {
        let Some(id) = at else {
            return;
        };
        let node = self.node(id);
        let above_lo = node.key.compare(lo) != Ordering::Less;
        let below_hi = node.key.compare(hi) != Ordering::Greater;

        if node.key.compare(lo) == Ordering::Greater {
            self.collect_range(node.left, lo, hi, out);
        }
        if above_lo && below_hi {
            out.extend_from(&node.bucket);
        }
        if node.key.compare(hi) == Ordering::Less {
            self.collect_range(node.right, lo, hi, out);
        }
    }

    fn height_of(&self, at: Option<NodeId>) -> usize {
        match at {
            None => 0,
            Some(id) => {
                let node = self.node(id);
                1 + self.height_of(node.left).max(self.height_of(node.right))
            }
        }
    }

    fn print_node<W: Write>(
        &self,
        id: NodeId,
        out: &mut W,
        prefix: &str,
        level: usize,
    ) -> Result<()> {
        let node = self.node(id);
        let child_prefix = format!("{}        ", prefix);

        if let Some(right) = node.right {
            self.print_node(right, out, &child_prefix, level + 1)?;
        }
        writeln!(
            out,
            "{}{}{}  [{}]",
            prefix,
            "<".repeat(level),
            node.key,
            node.bucket
        )?;
        if let Some(left) = node.left {
            self.print_node(left, out, &child_prefix, level + 1)?;
        }
        Ok(())
    }

    /// Returns the subtree height after checking it
    fn check_node(&self, at: Option<NodeId>, count: &mut usize) -> Result<usize> {
        let Some(id) = at else {
            return Ok(0);
        };
        *count += 1;

        let node = self.node(id);
        let left = self.check_node(node.left, count)?;
        let right = self.check_node(node.right, count)?;
        let actual = right as i64 - left as i64;

        if !(-1..=1).contains(&node.balance) {
            return Err(MenagerieError::Invariant(format!(
                "node {} has balance {}",
                node.key, node.balance
            )));
        }
        if actual != i64::from(node.balance) {
            return Err(MenagerieError::Invariant(format!(
                "node {} records balance {} but subtree heights differ by {}",
                node.key, node.balance, actual
            )));
        }
        if node.bucket.is_empty() {
            return Err(MenagerieError::Invariant(format!(
                "node {} has an empty bucket",
                node.key
            )));
        }

        Ok(1 + left.max(right))
    }
}

impl<K: IndexKey> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}
