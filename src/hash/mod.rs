//! Hash Index Module
//!
//! Primary-key index: string key → single row identifier.
//!
//! ## Responsibilities
//! - Open addressing with linear probing
//! - Tombstones so removals keep later probe chains reachable
//! - Grow above the max load factor, shrink below the min
//! - Expose probe counts for diagnostics
//!
//! ## Hash Function (folding)
//! ```text
//!   "tigress"  →  ['t','i','g','r'] ['e','s','s']
//!                  0x74696772     + 0x00657373   (big-endian chunks)
//!              →  sum mod capacity
//! ```
//!
//! ## Probe Sequence
//! `slot_i = (h + step * i) mod capacity`, at most `capacity` probes.
//! Every capacity the table allocates is kept coprime with the step so the
//! sequence visits each slot exactly once.

mod table;

pub use table::HashIndex;

use std::fmt;

use crate::error::{MenagerieError, Result};
use crate::RowId;

/// Grow when (len + 1) / capacity would exceed this
pub const LOAD_FACTOR_MAX: f64 = 0.75;

/// Shrink when len / capacity drops below this
pub const LOAD_FACTOR_MIN: f64 = 0.25;

/// State of one slot in the table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Slot {
    /// Never used since the last rehash; ends a probe chain
    #[default]
    Empty,

    /// Live entry
    Occupied { key: String, row: RowId },

    /// Removed entry; probe chains continue past it
    Tombstone,
}

impl Slot {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }
}

/// Result of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Row identifier stored under the key, `None` on a miss
    pub row: Option<RowId>,

    /// Number of slots inspected
    pub steps: usize,
}

/// Validated linear probing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeStep(usize);

impl ProbeStep {
    /// Step used when none is configured
    pub const DEFAULT: ProbeStep = ProbeStep(3);

    /// Build a step, rejecting zero
    pub fn new(step: usize) -> Result<Self> {
        if step == 0 {
            return Err(MenagerieError::Config(
                "probe step must be positive".to_string(),
            ));
        }
        Ok(Self(step))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Smallest capacity >= `target` whose probe sequence covers every slot
    pub fn coprime_capacity(self, target: usize) -> usize {
        let mut capacity = target.max(1);
        while gcd(capacity, self.0) != 1 {
            capacity += 1;
        }
        capacity
    }
}

impl Default for ProbeStep {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ProbeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
