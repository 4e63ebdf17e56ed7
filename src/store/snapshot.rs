//! Binary snapshot of the record arrays
//!
//! Indexes are never persisted; they are rebuilt after a load.
//!
//! ## File Format
//! ```text
//! ┌───────────┬─────────────┬─────────────┬─────────┬──────────────────┐
//! │ Magic (4) │ Version (2) │ Length (4)  │ CRC (4) │ bincode payload  │
//! └───────────┴─────────────┴─────────────┴─────────┴──────────────────┘
//! ```
//! Integers are little-endian. The CRC32 covers the payload only.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{MenagerieError, Result};

use super::{Animal, Feeding, RecordStore};

/// File magic
pub const MAGIC: &[u8; 4] = b"MNGS";

/// Current format version
pub const VERSION: u16 = 1;

/// Magic + version + length + crc
pub const HEADER_SIZE: usize = 14;

#[derive(Serialize)]
struct PayloadRef<'a> {
    animals: &'a RecordStore<Animal>,
    feedings: &'a RecordStore<Feeding>,
}

#[derive(Deserialize)]
struct Payload {
    animals: RecordStore<Animal>,
    feedings: RecordStore<Feeding>,
}

/// Record arrays restored from a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub animals: RecordStore<Animal>,
    pub feedings: RecordStore<Feeding>,
}

/// Frame both record arrays into snapshot bytes
pub fn encode(animals: &RecordStore<Animal>, feedings: &RecordStore<Feeding>) -> Result<Bytes> {
    let payload = bincode::serialize(&PayloadRef { animals, feedings })
        .map_err(|e| MenagerieError::Serialization(e.to_string()))?;

    let len = u32::try_from(payload.len()).map_err(|_| {
        MenagerieError::Snapshot(format!("payload too large: {} bytes", payload.len()))
    })?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    buf.put_slice(MAGIC);
    buf.put_u16_le(VERSION);
    buf.put_u32_le(len);
    buf.put_u32_le(crc32fast::hash(&payload));
    buf.put_slice(&payload);

    Ok(buf.freeze())
}

/// Validate framing and checksum, then decode the record arrays
pub fn decode(mut bytes: &[u8]) -> Result<Snapshot> {
    if bytes.len() < HEADER_SIZE {
        return Err(MenagerieError::Snapshot(format!(
            "incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut magic = [0u8; 4];
    bytes.copy_to_slice(&mut magic);
    if &magic != MAGIC {
        return Err(MenagerieError::Snapshot("bad magic".to_string()));
    }

    let version = bytes.get_u16_le();
    if version != VERSION {
        return Err(MenagerieError::Snapshot(format!(
            "unsupported version {}",
            version
        )));
    }

    let len = bytes.get_u32_le() as usize;
    let expected_crc = bytes.get_u32_le();
    if bytes.remaining() != len {
        return Err(MenagerieError::Snapshot(format!(
            "payload length mismatch: header says {}, found {}",
            len,
            bytes.remaining()
        )));
    }

    let actual_crc = crc32fast::hash(bytes);
    if actual_crc != expected_crc {
        return Err(MenagerieError::Snapshot(format!(
            "checksum mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    let payload: Payload =
        bincode::deserialize(bytes).map_err(|e| MenagerieError::Serialization(e.to_string()))?;

    Ok(Snapshot {
        animals: payload.animals,
        feedings: payload.feedings,
    })
}

/// Write a snapshot file; returns the number of bytes written
pub fn save(
    path: &Path,
    animals: &RecordStore<Animal>,
    feedings: &RecordStore<Feeding>,
) -> Result<usize> {
    let bytes = encode(animals, feedings)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    tracing::info!(
        path = %path.display(),
        animals = animals.len(),
        feedings = feedings.len(),
        bytes = bytes.len(),
        "snapshot saved"
    );
    Ok(bytes.len())
}

/// Read and validate a snapshot file
pub fn load(path: &Path) -> Result<Snapshot> {
    let bytes = std::fs::read(path)?;
    let snapshot = decode(&bytes)?;

    tracing::info!(
        path = %path.display(),
        animals = snapshot.animals.len(),
        feedings = snapshot.feedings.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
