//! Error types for Menagerie
//!
//! Provides a unified error type for all operations.
//!
//! Lookups that miss are not errors: the indexes report them as `None` or as
//! an empty bucket. Only conditions a caller must react to end up here.

use thiserror::Error;

/// Result type alias using MenagerieError
pub type Result<T> = std::result::Result<T, MenagerieError>;

/// Unified error type for Menagerie operations
#[derive(Debug, Error)]
pub enum MenagerieError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Hash table full: no usable slot after {capacity} probes")]
    HashTableFull { capacity: usize },

    #[error("Index invariant violated: {0}")]
    Invariant(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid date '{0}': expected DD.MM.YYYY")]
    InvalidDate(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // -------------------------------------------------------------------------
    // Import / Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
