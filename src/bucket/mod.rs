//! Duplicate Bucket Module
//!
//! Ordered multiset of row identifiers that share one secondary-index key.
//!
//! ## Responsibilities
//! - Preserve insertion order of row identifiers
//! - Allow duplicates (no deduplication)
//! - Positional reads, value search, bulk value removal
//! - Predecessor-targeted removal (`remove_before_value`)
//!
//! ## Layout
//! A circular doubly-linked list whose nodes live in a dense arena.
//! Links are arena positions, freed positions are recycled.
//! ```text
//!        ┌──────────────────────────────────────┐
//!        ▼                                      │
//!   ┌────────┐ next ┌────────┐ next ┌────────┐  │
//!   │ head 4 │─────▶│   7    │─────▶│   4    │──┘
//!   └────────┘◀─────└────────┘◀─────└────────┘
//!        │     prev            prev      ▲
//!        └───────────── prev ────────────┘
//! ```

mod list;

pub use list::{DuplicateBucket, Iter};
