//! Snapshot Tests
//!
//! Tests verify:
//! - Save / load preserves both record arrays
//! - Header layout
//! - Corruption, truncation and version checks

use menagerie::store::snapshot::{self, HEADER_SIZE, MAGIC, VERSION};
use menagerie::{Animal, Feeding, MenagerieError, RecordStore};
use tempfile::TempDir;

fn sample() -> (RecordStore<Animal>, RecordStore<Feeding>) {
    let animals = vec![
        Animal::new("Simba", "Lion", "A1"),
        Animal::new("Kaa", "Python", "R2"),
    ]
    .into();
    let feedings = vec![
        Feeding::new("Simba", "Meat", 3, "01.02.2024"),
        Feeding::new("Kaa", "Mice", 1, "03.02.2024"),
    ]
    .into();
    (animals, feedings)
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zoo.snap");
    let (animals, feedings) = sample();

    let written = snapshot::save(&path, &animals, &feedings).unwrap();
    assert_eq!(written as u64, std::fs::metadata(&path).unwrap().len());

    let loaded = snapshot::load(&path).unwrap();
    assert_eq!(loaded.animals, animals);
    assert_eq!(loaded.feedings, feedings);
}

#[test]
fn test_empty_arrays() {
    let bytes = snapshot::encode(&RecordStore::new(), &RecordStore::new()).unwrap();
    let decoded = snapshot::decode(&bytes).unwrap();
    assert!(decoded.animals.is_empty());
    assert!(decoded.feedings.is_empty());
}

#[test]
fn test_header_layout() {
    let (animals, feedings) = sample();
    let bytes = snapshot::encode(&animals, &feedings).unwrap();

    assert_eq!(&bytes[0..4], MAGIC);
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), VERSION);

    let len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    assert_eq!(len, bytes.len() - HEADER_SIZE);

    let crc = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
    assert_eq!(crc, crc32fast::hash(&bytes[HEADER_SIZE..]));
}

#[test]
fn test_corrupted_payload_fails_checksum() {
    let (animals, feedings) = sample();
    let mut bytes = snapshot::encode(&animals, &feedings).unwrap().to_vec();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let err = snapshot::decode(&bytes).unwrap_err();
    assert!(matches!(err, MenagerieError::Snapshot(ref msg) if msg.contains("checksum")));
}

#[test]
fn test_bad_magic() {
    let (animals, feedings) = sample();
    let mut bytes = snapshot::encode(&animals, &feedings).unwrap().to_vec();
    bytes[0] = b'X';

    assert!(matches!(snapshot::decode(&bytes), Err(MenagerieError::Snapshot(_))));
}

#[test]
fn test_unsupported_version() {
    let (animals, feedings) = sample();
    let mut bytes = snapshot::encode(&animals, &feedings).unwrap().to_vec();
    bytes[4..6].copy_from_slice(&(VERSION + 1).to_le_bytes());

    let err = snapshot::decode(&bytes).unwrap_err();
    assert!(matches!(err, MenagerieError::Snapshot(ref msg) if msg.contains("version")));
}

#[test]
fn test_truncated_input() {
    let (animals, feedings) = sample();
    let bytes = snapshot::encode(&animals, &feedings).unwrap();

    assert!(snapshot::decode(&bytes[..HEADER_SIZE - 1]).is_err());
    assert!(snapshot::decode(&bytes[..bytes.len() - 1]).is_err());
}
