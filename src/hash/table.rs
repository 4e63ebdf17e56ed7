//! Open-addressed hash table
//!
//! Maps a primary key to the row identifier of its record.

use std::io::Write;

use crate::error::{MenagerieError, Result};
use crate::RowId;

use super::{ProbeStep, SearchOutcome, Slot, LOAD_FACTOR_MAX, LOAD_FACTOR_MIN};

/// Primary-key index over a record store
///
/// ## Invariants
/// - At most one `Occupied` slot holds a given key
/// - `len` equals the number of `Occupied` slots
/// - `capacity >= initial_capacity`, and every capacity is coprime with the
///   probe step
#[derive(Debug, Clone)]
pub struct HashIndex {
    /// Slot array; its length is the capacity
    slots: Vec<Slot>,

    /// Number of occupied slots
    len: usize,

    /// Floor for shrinking, target for `clear`
    initial_capacity: usize,

    /// Linear probing step
    step: ProbeStep,
}

impl HashIndex {
    /// Default starting capacity
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Create an empty table with the default probe step
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_step(initial_capacity, ProbeStep::DEFAULT)
    }

    /// Create an empty table with a custom probe step
    ///
    /// The capacity is raised to the next value coprime with the step.
    pub fn with_step(initial_capacity: usize, step: ProbeStep) -> Self {
        let capacity = step.coprime_capacity(initial_capacity);
        Self {
            slots: vec![Slot::Empty; capacity],
            len: 0,
            initial_capacity: capacity,
            step,
        }
    }

    /// Insert or overwrite the row identifier for `key`
    ///
    /// Grows first when the insert would push the load factor above the
    /// maximum. Re-inserting an existing key replaces its row identifier.
    /// Fails with `HashTableFull` only when every probe hit a live slot
    /// holding another key.
    pub fn insert(&mut self, key: &str, row: RowId) -> Result<()> {
        if (self.len + 1) as f64 / self.capacity() as f64 > LOAD_FACTOR_MAX {
            self.rehash(self.capacity() * 2);
        }

        let idx = self
            .find_slot(key, true)
            .ok_or(MenagerieError::HashTableFull {
                capacity: self.capacity(),
            })?;

        match &mut self.slots[idx] {
            Slot::Occupied { key: existing, row: stored } if existing == key => {
                *stored = row;
            }
            slot => {
                *slot = Slot::Occupied {
                    key: key.to_string(),
                    row,
                };
                self.len += 1;
            }
        }

        Ok(())
    }

    /// Remove `key`, leaving a tombstone in its slot
    ///
    /// Returns false when the key is not present. Shrinks when the load
    /// factor drops below the minimum, never below the initial capacity.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(idx) = self.find_slot(key, false) else {
            return false;
        };
        if !self.slots[idx].is_occupied() {
            return false;
        }

        self.slots[idx] = Slot::Tombstone;
        self.len -= 1;

        if self.capacity() > self.initial_capacity
            && (self.len as f64) / (self.capacity() as f64) < LOAD_FACTOR_MIN
        {
            let target = (self.capacity() / 2).max(self.initial_capacity);
            self.rehash(target);
        }

        true
    }

    /// Look up `key`
    ///
    /// Stops at the first empty slot (miss) or matching occupied slot (hit).
    /// Tombstones are stepped over.
    pub fn search(&self, key: &str) -> SearchOutcome {
        let capacity = self.capacity();
        let mut idx = self.primary_hash(key);
        let mut steps = 0;

        for _ in 0..capacity {
            steps += 1;
            match &self.slots[idx] {
                Slot::Empty => return SearchOutcome { row: None, steps },
                Slot::Occupied { key: existing, row } if existing == key => {
                    return SearchOutcome {
                        row: Some(*row),
                        steps,
                    };
                }
                _ => {}
            }
            idx = (idx + self.step.get()) % capacity;
        }

        SearchOutcome { row: None, steps }
    }

    /// Row identifier for `key`, ignoring the probe count
    pub fn get(&self, key: &str) -> Option<RowId> {
        self.search(key).row
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop every entry and return to the initial capacity
    pub fn clear(&mut self) {
        self.slots = vec![Slot::Empty; self.initial_capacity];
        self.len = 0;
    }

    /// Drop every entry and adopt a new initial capacity
    ///
    /// Destructive: no entry survives. Callers re-populate from the store.
    pub fn resize(&mut self, new_initial_capacity: usize) {
        let capacity = self.step.coprime_capacity(new_initial_capacity);
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity = capacity,
            "hash index reset to new initial capacity"
        );
        self.slots = vec![Slot::Empty; capacity];
        self.initial_capacity = capacity;
        self.len = 0;
    }

    /// Move every live entry into a fresh slot array
    ///
    /// Tombstones are dropped. The capacity is raised when needed so that
    /// every entry fits, the initial capacity stays a floor, and the probe
    /// sequence covers the whole table.
    pub fn rehash(&mut self, new_capacity: usize) {
        let target = new_capacity
            .max(self.len + 1)
            .max(self.initial_capacity);
        let capacity = self.step.coprime_capacity(target);
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity = capacity,
            entries = self.len,
            "rehashing hash index"
        );

        let old = std::mem::replace(&mut self.slots, vec![Slot::Empty; capacity]);
        self.len = 0;

        for slot in old {
            if let Slot::Occupied { key, row } = slot {
                // Fresh table: no tombstones, keys already unique
                let mut idx = self.primary_hash(&key);
                while self.slots[idx].is_occupied() {
                    idx = (idx + self.step.get()) % capacity;
                }
                self.slots[idx] = Slot::Occupied { key, row };
                self.len += 1;
            }
        }
    }

    // =========================================================================
    // Accessors (for diagnostics)
    // =========================================================================

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Occupied slots / capacity
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn probe_step(&self) -> ProbeStep {
        self.step
    }

    /// Inspect a slot, `None` when out of range
    pub fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx)
    }

    /// Home slot of `key` at the current capacity
    pub fn primary_hash(&self, key: &str) -> usize {
        (Self::fold_hash(key) % self.capacity() as u64) as usize
    }

    /// Number of tombstones currently in the table
    pub fn tombstones(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }

    /// Live entries in slot order
    pub fn entries(&self) -> impl Iterator<Item = (&str, RowId)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, row } => Some((key.as_str(), *row)),
            _ => None,
        })
    }

    /// Sum of the key's bytes taken as big-endian 4-byte chunks
    ///
    /// The last chunk may be shorter than 4 bytes; it is read as the value
    /// of its own bytes.
    pub fn fold_hash(key: &str) -> u64 {
        key.as_bytes().chunks(4).fold(0u64, |hash, chunk| {
            let value = chunk
                .iter()
                .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
            hash.wrapping_add(u64::from(value))
        })
    }

    /// Write a per-slot dump to `out`
    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        const RULE: &str =
            "==================================================================";

        writeln!(out, "=== Hash Index ===")?;
        writeln!(
            out,
            "Capacity: {}, Size: {}, Load Factor: {:.2}, Step: {}",
            self.capacity(),
            self.len,
            self.load_factor(),
            self.step
        )?;
        writeln!(out)?;

        for (idx, slot) in self.slots.iter().enumerate() {
            writeln!(out, "{}", RULE)?;
            match slot {
                Slot::Empty => writeln!(out, "Slot {:>3}: empty", idx)?,
                Slot::Tombstone => writeln!(out, "Slot {:>3}: tombstone", idx)?,
                Slot::Occupied { key, row } => writeln!(
                    out,
                    "Slot {:>3}: key={}, row={}, hash={}",
                    idx,
                    key,
                    row,
                    self.primary_hash(key)
                )?,
            }
        }
        writeln!(out, "{}", RULE)?;

        Ok(())
    }

    /// Verify the structural invariants (used by tests)
    pub fn check_invariants(&self) -> Result<()> {
        let occupied = self.slots.iter().filter(|s| s.is_occupied()).count();
        if occupied != self.len {
            return Err(MenagerieError::Invariant(format!(
                "len {} but {} occupied slots",
                self.len, occupied
            )));
        }
        if self.capacity() < self.initial_capacity {
            return Err(MenagerieError::Invariant(format!(
                "capacity {} below initial capacity {}",
                self.capacity(),
                self.initial_capacity
            )));
        }

        let mut keys: Vec<&str> = self.entries().map(|(key, _)| key).collect();
        keys.sort_unstable();
        if keys.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(MenagerieError::Invariant(
                "a key occupies more than one slot".to_string(),
            ));
        }

        for (key, row) in self.entries() {
            if self.search(key).row != Some(row) {
                return Err(MenagerieError::Invariant(format!(
                    "key '{}' unreachable from its probe chain",
                    key
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Probe for `key`
    ///
    /// Lookup mode returns the matching occupied slot or the empty slot that
    /// ended the chain. Insertion mode prefers the first tombstone seen over
    /// that empty slot, and falls back to it when the chain is exhausted.
    fn find_slot(&self, key: &str, for_insertion: bool) -> Option<usize> {
        let capacity = self.capacity();
        let mut idx = self.primary_hash(key);
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match &self.slots[idx] {
                Slot::Empty => {
                    return if for_insertion {
                        first_tombstone.or(Some(idx))
                    } else {
                        Some(idx)
                    };
                }
                Slot::Occupied { key: existing, .. } if existing == key => {
                    return Some(idx);
                }
                Slot::Occupied { .. } => {}
                Slot::Tombstone => {
                    if for_insertion && first_tombstone.is_none() {
                        first_tombstone = Some(idx);
                    }
                }
            }
            idx = (idx + self.step.get()) % capacity;
        }

        if for_insertion {
            first_tombstone
        } else {
            None
        }
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
