//! In-order iterator over an ordered index

use crate::bucket::DuplicateBucket;

use super::avl::{NodeId, OrderedIndex};
use super::IndexKey;

/// Yields `(key, bucket)` pairs in ascending key order
///
/// Uses an explicit stack, so memory is bounded by the tree height.
pub struct Iter<'a, K> {
    index: &'a OrderedIndex<K>,
    stack: Vec<NodeId>,
}

impl<'a, K: IndexKey> Iter<'a, K> {
    pub(super) fn new(index: &'a OrderedIndex<K>) -> Self {
        let mut iter = Self {
            index,
            stack: Vec::new(),
        };
        iter.push_left_spine(index.root());
        iter
    }

    fn push_left_spine(&mut self, mut at: Option<NodeId>) {
        while let Some(id) = at {
            self.stack.push(id);
            at = self.index.node(id).left;
        }
    }
}

impl<'a, K: IndexKey> Iterator for Iter<'a, K> {
    type Item = (&'a K, &'a DuplicateBucket);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.index.node(id);
        self.push_left_spine(node.right);
        Some((&node.key, &node.bucket))
    }
}

impl<'a, K: IndexKey> IntoIterator for &'a OrderedIndex<K> {
    type Item = (&'a K, &'a DuplicateBucket);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
