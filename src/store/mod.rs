//! Record Store Module
//!
//! Owns record content; indexes only ever hold row identifiers into it.
//!
//! ## Responsibilities
//! - Flat, append/erase-capable row storage (`RecordStore`)
//! - Zoo record shapes (`Animal`, `Feeding`)
//! - Whitespace-delimited text import/export
//! - Binary snapshot of the record arrays
//!
//! Row identifiers are positions, so `erase` shifts every later row down
//! by one. Callers that erase must rebuild their indexes afterwards.

mod records;
mod table;
pub mod snapshot;
pub mod text;

pub use records::{Animal, Feeding};
pub use table::RecordStore;
pub use text::TextRecord;
