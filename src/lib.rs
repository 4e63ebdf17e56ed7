//! # Menagerie
//!
//! An in-memory zoo catalog indexed by hand-built data structures:
//! - Open-addressing hash table for the animal primary key
//! - AVL trees for secondary keys (species, nickname, quantity, date)
//! - Circular duplicate buckets holding row identifiers per key
//! - Flat-text import/export and checksummed binary snapshots
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI / Caller                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Catalog                                │
//! │          (validation, queries, reports, rebuilds)            │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!  ┌───────────┐        ┌──────────────┐       ┌──────────────┐
//!  │ HashIndex │        │ OrderedIndex │       │ RecordStore  │
//!  │ (probing) │        │    (AVL)     │       │  (row array) │
//!  └───────────┘        └──────┬───────┘       └──────┬───────┘
//!                              │                      │
//!                              ▼                      ▼
//!                      ┌───────────────┐      ┌───────────────┐
//!                      │DuplicateBucket│      │ text/snapshot │
//!                      └───────────────┘      └───────────────┘
//! ```
//!
//! Indexes store row identifiers only. Any change that shifts rows is
//! followed by a full index rebuild.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod bucket;
pub mod hash;
pub mod tree;
pub mod date;
pub mod store;
pub mod catalog;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MenagerieError, Result};
pub use config::Config;
pub use bucket::DuplicateBucket;
pub use hash::HashIndex;
pub use tree::{IndexKey, OrderedIndex};
pub use date::DateKey;
pub use store::{Animal, Feeding, RecordStore};
pub use catalog::{Catalog, FeedingReport, IndexKind};

/// Position of a record in its store
pub type RowId = usize;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Menagerie
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
