//! Flat record storage

use serde::{Deserialize, Serialize};

use crate::RowId;

/// Growable sequence of records addressed by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore<R> {
    rows: Vec<R>,
}

impl<R> RecordStore<R> {
    /// Create an empty store
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a record; returns its row identifier
    pub fn append(&mut self, record: R) -> RowId {
        self.rows.push(record);
        self.rows.len() - 1
    }

    pub fn get(&self, row: RowId) -> Option<&R> {
        self.rows.get(row)
    }

    /// Remove the record at `row`, shifting later rows down
    pub fn erase(&mut self, row: RowId) -> Option<R> {
        if row < self.rows.len() {
            Some(self.rows.remove(row))
        } else {
            None
        }
    }

    /// Keep only the records matching `keep`; returns how many were dropped
    pub fn retain<F: FnMut(&R) -> bool>(&mut self, keep: F) -> usize {
        let before = self.rows.len();
        self.rows.retain(keep);
        before - self.rows.len()
    }

    /// Row identifier of the first record matching `predicate`
    pub fn position<F: FnMut(&R) -> bool>(&self, predicate: F) -> Option<RowId> {
        self.rows.iter().position(predicate)
    }

    /// Replace the whole content
    pub fn replace(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// `(row, record)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &R)> {
        self.rows.iter().enumerate()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.rows
    }

    /// Give up the records, in row order
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> From<Vec<R>> for RecordStore<R> {
    fn from(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

impl<R> FromIterator<R> for RecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
