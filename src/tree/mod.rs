//! Ordered Index Module
//!
//! Secondary indexes: totally ordered key → bucket of row identifiers.
//!
//! ## Responsibilities
//! - AVL insertion/deletion with explicit balance factors
//! - Duplicate keys chained through a `DuplicateBucket`
//! - Exact, range and full ordered scans
//!
//! ## Node Layout
//! ```text
//!            ┌───────────────────────────┐
//!            │ key │ balance │ bucket    │
//!            │     │ -1/0/+1 │ 4 -> 9    │
//!            └──┬────────────────────┬───┘
//!          left │                    │ right
//!               ▼                    ▼
//!          (smaller keys)      (larger keys)
//! ```
//! Balance is `height(right) - height(left)`. Nodes live in an arena and
//! refer to each other by position; freed positions are reused.

mod avl;
mod iter;

pub use avl::OrderedIndex;
pub use iter::Iter;

use std::cmp::Ordering;
use std::fmt;

/// Comparison capability required from an ordered-index key
pub trait IndexKey: Clone + fmt::Debug + fmt::Display {
    /// Total order over keys
    fn compare(&self, other: &Self) -> Ordering;
}

macro_rules! impl_index_key_for_ord {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IndexKey for $ty {
                fn compare(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

impl_index_key_for_ord!(i32, i64, u32, u64, usize, String);

/// IEEE 754 total order: -0.0 sorts before +0.0, NaN sorts last
impl IndexKey for f64 {
    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}
