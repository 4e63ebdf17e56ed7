//! Record Store / Text Format Tests
//!
//! Tests verify:
//! - RecordStore append, erase and iteration order
//! - Parsing and rendering of record lines
//! - File import and export through a temp directory

use std::fs;

use menagerie::store::text::{self, TextRecord};
use menagerie::{Animal, Feeding, MenagerieError, RecordStore};
use tempfile::TempDir;

// =============================================================================
// RecordStore Tests
// =============================================================================

#[test]
fn test_append_returns_sequential_rows() {
    let mut store = RecordStore::new();
    assert_eq!(store.append(Animal::new("Simba", "Lion", "A1")), 0);
    assert_eq!(store.append(Animal::new("Nala", "Lion", "A2")), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(1).map(|a| a.nickname.as_str()), Some("Nala"));
    assert_eq!(store.get(2), None);
}

#[test]
fn test_erase_shifts_later_rows() {
    let mut store: RecordStore<Animal> = vec![
        Animal::new("a", "Lion", "1"),
        Animal::new("b", "Lion", "2"),
        Animal::new("c", "Lion", "3"),
    ]
    .into();

    let erased = store.erase(0).unwrap();
    assert_eq!(erased.nickname, "a");
    assert_eq!(store.get(0).map(|a| a.nickname.as_str()), Some("b"));
    assert_eq!(store.erase(5), None);
}

#[test]
fn test_iter_in_row_order() {
    let store: RecordStore<Animal> = ["x", "y", "z"]
        .iter()
        .map(|n| Animal::new(*n, "Owl", "C1"))
        .collect();

    let rows: Vec<(usize, &str)> = store
        .iter()
        .map(|(row, a)| (row, a.nickname.as_str()))
        .collect();
    assert_eq!(rows, vec![(0, "x"), (1, "y"), (2, "z")]);
}

#[test]
fn test_retain_and_position() {
    let mut store: RecordStore<Feeding> = vec![
        Feeding::new("a", "Meat", 1, "01.01.2024"),
        Feeding::new("b", "Fish", 2, "01.01.2024"),
        Feeding::new("a", "Meat", 3, "02.01.2024"),
    ]
    .into();

    assert_eq!(store.position(|f| f.nickname == "b"), Some(1));
    assert_eq!(store.retain(|f| f.nickname != "a"), 2);
    assert_eq!(store.len(), 1);

    store.clear();
    assert!(store.is_empty());
}

// =============================================================================
// Line Format Tests
// =============================================================================

#[test]
fn test_parse_line() {
    let animal: Animal = text::parse_line(1, "Raja  Tiger\tB-3").unwrap().unwrap();
    assert_eq!(animal, Animal::new("Raja", "Tiger", "B-3"));

    let blank: Option<Animal> = text::parse_line(2, "   ").unwrap();
    assert!(blank.is_none());
}

#[test]
fn test_parse_line_reports_line_number() {
    let err = text::parse_line::<Feeding>(7, "Raja Meat many 01.01.2024").unwrap_err();
    assert!(matches!(err, MenagerieError::Parse { line: 7, .. }));

    let err = text::parse_line::<Animal>(3, "Raja Tiger").unwrap_err();
    assert!(matches!(err, MenagerieError::Parse { line: 3, .. }));
}

#[test]
fn test_to_line() {
    assert_eq!(Animal::new("Raja", "Tiger", "B-3").to_line(), "Raja Tiger B-3");
    assert_eq!(
        Feeding::new("Raja", "Meat", 4, "02.02.2024").to_line(),
        "Raja Meat 4 02.02.2024"
    );
}

#[test]
fn test_read_records_skips_malformed() {
    let input = "Raja Meat 4 02.02.2024\nbroken line\n\nNala Fish 2 03.02.2024\n";
    let feedings: Vec<Feeding> = text::read_records(input.as_bytes(), None).unwrap();
    assert_eq!(feedings.len(), 2);
    assert_eq!(feedings[1].nickname, "Nala");
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_export_then_import_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("animals.txt");

    let animals = vec![Animal::new("Simba", "Lion", "A1"), Animal::new("Kaa", "Python", "R2")];
    assert_eq!(text::export_file(&path, &animals).unwrap(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "Simba Lion A1\nKaa Python R2\n");

    let back: Vec<Animal> = text::import_file(&path, None).unwrap();
    assert_eq!(back, animals);
}

#[test]
fn test_import_honors_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("feedings.txt");
    fs::write(&path, "a Meat 1 01.01.2024\nb Meat 2 01.01.2024\nc Meat 3 01.01.2024\n").unwrap();

    let feedings: Vec<Feeding> = text::import_file(&path, Some(1)).unwrap();
    assert_eq!(feedings, vec![Feeding::new("a", "Meat", 1, "01.01.2024")]);
}

#[test]
fn test_import_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = text::import_file::<Animal>(&dir.path().join("nope.txt"), None);
    assert!(matches!(result, Err(MenagerieError::Io(_))));
}
