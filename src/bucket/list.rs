//! Circular list implementation
//!
//! Arena-backed circular doubly-linked list of row identifiers.

use std::fmt;
use std::io::Write;

use crate::RowId;

/// A single arena node
#[derive(Debug, Clone, Copy)]
struct Link {
    value: RowId,
    next: usize,
    prev: usize,
}

/// Ordered bag of row identifiers for one index key
///
/// Cloning copies every node, so a clone has a lifetime independent from
/// its source. Equality compares the head-to-tail sequences, not the arena
/// layout.
#[derive(Debug, Clone, Default)]
pub struct DuplicateBucket {
    /// Node arena (free positions are listed in `free`)
    nodes: Vec<Link>,

    /// Recyclable arena positions
    free: Vec<usize>,

    /// First node, `None` for the empty bucket
    head: Option<usize>,
}

impl DuplicateBucket {
    /// Create an empty bucket
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket holding a single row identifier
    pub fn with_value(value: RowId) -> Self {
        let mut bucket = Self::new();
        bucket.add(value);
        bucket
    }

    /// Append a value after the current tail (the head's predecessor)
    pub fn add(&mut self, value: RowId) {
        let idx = self.alloc(value);
        match self.head {
            None => self.head = Some(idx),
            Some(head) => {
                let tail = self.nodes[head].prev;
                self.nodes[tail].next = idx;
                self.nodes[idx].prev = tail;
                self.nodes[idx].next = head;
                self.nodes[head].prev = idx;
            }
        }
    }

    /// Append every value of `other`, head to tail
    pub fn extend_from(&mut self, other: &DuplicateBucket) {
        for value in other.iter() {
            self.add(value);
        }
    }

    /// Remove every node holding `value`
    ///
    /// Removing the last node leaves the bucket in its empty state.
    pub fn remove_all(&mut self, value: RowId) {
        let Some(head) = self.head else {
            return;
        };

        let count = self.size();
        let mut cur = head;
        for _ in 0..count {
            let next = self.nodes[cur].next;
            if self.nodes[cur].value == value {
                self.unlink(cur);
            }
            cur = next;
        }
    }

    /// Remove the node immediately preceding the first node equal to `value`
    ///
    /// The scan starts at the head, so when the head itself matches, the
    /// tail is removed. No-op on an empty or single-node bucket, or when no
    /// node matches.
    pub fn remove_before_value(&mut self, value: RowId) {
        let Some(head) = self.head else {
            return;
        };
        if self.nodes[head].next == head {
            return;
        }

        let mut cur = head;
        loop {
            if self.nodes[cur].value == value {
                let target = self.nodes[cur].prev;
                self.unlink(target);
                return;
            }
            cur = self.nodes[cur].next;
            if cur == head {
                return;
            }
        }
    }

    /// Value at 0-based position `index`, `None` when out of range
    pub fn get(&self, index: usize) -> Option<RowId> {
        self.iter().nth(index)
    }

    /// Position of the first node equal to `value`
    pub fn find(&self, value: RowId) -> Option<usize> {
        self.iter().position(|v| v == value)
    }

    /// Whether any node holds `value`
    pub fn contains(&self, value: RowId) -> bool {
        self.find(value).is_some()
    }

    /// Number of nodes
    ///
    /// Counts by walking the ring: O(n), nothing is cached.
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Read the contents as base-10 digits, head first
    ///
    /// Returns 0 for an empty bucket. Overflow wraps.
    pub fn to_number(&self) -> u64 {
        self.iter().fold(0u64, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(digit as u64)
        })
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
    }

    /// Iterate head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bucket: self,
            cursor: self.head,
        }
    }

    /// Collect the contents into a vector, head to tail
    pub fn to_vec(&self) -> Vec<RowId> {
        self.iter().collect()
    }

    /// Write the head-to-tail rendering to `out`
    pub fn print<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{}", self)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Take a self-linked node from the free list or the end of the arena
    fn alloc(&mut self, value: RowId) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Link {
                    value,
                    next: idx,
                    prev: idx,
                };
                idx
            }
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Link {
                    value,
                    next: idx,
                    prev: idx,
                });
                idx
            }
        }
    }

    /// Detach a live node and recycle its position
    fn unlink(&mut self, idx: usize) {
        let Link { next, prev, .. } = self.nodes[idx];

        if next == idx {
            // Last node
            self.clear();
            return;
        }

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        if self.head == Some(idx) {
            self.head = Some(next);
        }
        self.free.push(idx);
    }
}

impl PartialEq for DuplicateBucket {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for DuplicateBucket {}

impl fmt::Display for DuplicateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[empty]");
        }
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl FromIterator<RowId> for DuplicateBucket {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        let mut bucket = Self::new();
        for value in iter {
            bucket.add(value);
        }
        bucket
    }
}

impl<'a> IntoIterator for &'a DuplicateBucket {
    type Item = RowId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Head-to-tail iterator over a bucket
pub struct Iter<'a> {
    bucket: &'a DuplicateBucket,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = RowId;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let link = self.bucket.nodes[idx];
        self.cursor = if Some(link.next) == self.bucket.head {
            None
        } else {
            Some(link.next)
        };
        Some(link.value)
    }
}
