//! HashIndex Tests
//!
//! Tests verify:
//! - Insert / search / remove round-trips
//! - Collision chains and tombstone handling
//! - Grow and shrink thresholds
//! - Probe step configuration
//! - Clear and destructive resize

use menagerie::hash::{ProbeStep, Slot};
use menagerie::{HashIndex, MenagerieError};

// "a" = 97, "q" = 113, "A" = 65: all land on slot 1 of a 16-slot table
const COLLIDING: [&str; 3] = ["a", "q", "A"];

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table = HashIndex::new(16);
    assert!(table.is_empty());
    assert_eq!(table.capacity(), 16);
    assert_eq!(table.initial_capacity(), 16);
    assert_eq!(table.probe_step(), ProbeStep::DEFAULT);
    assert_eq!(table.load_factor(), 0.0);
}

#[test]
fn test_insert_and_search() {
    let mut table = HashIndex::new(16);
    table.insert("Simba", 0).unwrap();
    table.insert("Nala", 1).unwrap();

    assert_eq!(table.get("Simba"), Some(0));
    assert_eq!(table.get("Nala"), Some(1));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_search_miss_on_empty_slot() {
    let table = HashIndex::new(16);
    let outcome = table.search("nobody");

    assert_eq!(outcome.row, None);
    assert_eq!(outcome.steps, 1);
}

#[test]
fn test_insert_existing_key_overwrites() {
    let mut table = HashIndex::new(16);
    table.insert("Raja", 3).unwrap();
    table.insert("Raja", 8).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("Raja"), Some(8));
}

#[test]
fn test_remove_missing_key_returns_false() {
    let mut table = HashIndex::new(16);
    table.insert("Raja", 0).unwrap();

    assert!(!table.remove("Simba"));
    assert_eq!(table.len(), 1);
}

// =============================================================================
// Collision / Tombstone Tests
// =============================================================================

#[test]
fn test_colliding_keys_follow_probe_step() {
    let mut table = HashIndex::new(16);
    for (row, key) in COLLIDING.iter().enumerate() {
        table.insert(key, row).unwrap();
    }

    assert_eq!(table.primary_hash("a"), 1);
    assert_eq!(table.primary_hash("q"), 1);
    assert!(matches!(table.slot(1), Some(Slot::Occupied { key, .. }) if key == "a"));
    assert!(matches!(table.slot(4), Some(Slot::Occupied { key, .. }) if key == "q"));
    assert!(matches!(table.slot(7), Some(Slot::Occupied { key, .. }) if key == "A"));

    assert_eq!(table.search("A").steps, 3);
}

#[test]
fn test_tombstone_keeps_chain_reachable() {
    let mut table = HashIndex::new(16);
    table.insert("a", 0).unwrap();
    table.insert("q", 1).unwrap();

    assert!(table.remove("a"));
    assert_eq!(table.slot(1), Some(&Slot::Tombstone));
    assert_eq!(table.tombstones(), 1);

    let outcome = table.search("q");
    assert_eq!(outcome.row, Some(1));
    assert_eq!(outcome.steps, 2);
    assert_eq!(table.get("a"), None);
}

#[test]
fn test_insert_reuses_first_tombstone() {
    let mut table = HashIndex::new(16);
    table.insert("a", 0).unwrap();
    table.insert("q", 1).unwrap();
    table.remove("a");

    table.insert("A", 2).unwrap();

    assert!(matches!(table.slot(1), Some(Slot::Occupied { key, row: 2 }) if key == "A"));
    assert_eq!(table.tombstones(), 0);
    assert_eq!(table.get("a"), None);
    assert_eq!(table.get("q"), Some(1));
    table.check_invariants().unwrap();
}

#[test]
fn test_reinsert_after_tombstone_does_not_duplicate() {
    let mut table = HashIndex::new(16);
    table.insert("a", 0).unwrap();
    table.insert("q", 1).unwrap();
    table.remove("a");

    // "q" sits past the tombstone; overwriting must not create a second copy
    table.insert("q", 5).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.get("q"), Some(5));
    table.check_invariants().unwrap();
}

// =============================================================================
// Resize Tests
// =============================================================================

#[test]
fn test_grows_when_load_exceeds_max() {
    let mut table = HashIndex::new(16);
    for row in 0..12 {
        table.insert(&format!("animal{}", row), row).unwrap();
    }
    assert_eq!(table.capacity(), 16);

    table.insert("animal12", 12).unwrap();
    assert_eq!(table.capacity(), 32);

    for row in 0..13 {
        assert_eq!(table.get(&format!("animal{}", row)), Some(row));
    }
    assert!(table.load_factor() <= 0.75);
}

#[test]
fn test_shrinks_when_load_drops_below_min() {
    let mut table = HashIndex::new(16);
    for row in 0..13 {
        table.insert(&format!("animal{}", row), row).unwrap();
    }
    assert_eq!(table.capacity(), 32);

    for row in 0..5 {
        table.remove(&format!("animal{}", row));
    }
    // 8 / 32 is not below 0.25
    assert_eq!(table.capacity(), 32);

    table.remove("animal5");
    assert_eq!(table.capacity(), 16);
    assert_eq!(table.tombstones(), 0);
    for row in 6..13 {
        assert_eq!(table.get(&format!("animal{}", row)), Some(row));
    }
}

#[test]
fn test_load_stays_above_min_while_draining() {
    let mut table = HashIndex::new(16);
    for row in 0..200 {
        table.insert(&format!("animal{}", row), row).unwrap();
    }
    assert!(table.capacity() > 16);

    for row in 0..200 {
        assert!(table.remove(&format!("animal{}", row)));
        assert!(
            table.capacity() == table.initial_capacity() || table.load_factor() >= 0.25,
            "load {} at capacity {} after removing {} keys",
            table.load_factor(),
            table.capacity(),
            row + 1
        );
    }

    assert!(table.is_empty());
    assert_eq!(table.capacity(), 16);
    table.check_invariants().unwrap();
}

#[test]
fn test_never_shrinks_below_initial_capacity() {
    let mut table = HashIndex::new(16);
    table.insert("x", 0).unwrap();
    table.remove("x");

    assert_eq!(table.capacity(), 16);
    assert!(table.is_empty());
}

#[test]
fn test_clear_returns_to_initial_capacity() {
    let mut table = HashIndex::new(16);
    for row in 0..20 {
        table.insert(&format!("k{}", row), row).unwrap();
    }
    table.clear();

    assert!(table.is_empty());
    assert_eq!(table.capacity(), 16);
    assert_eq!(table.get("k1"), None);
}

#[test]
fn test_resize_is_destructive() {
    let mut table = HashIndex::new(16);
    table.insert("Simba", 0).unwrap();
    table.resize(64);

    assert!(table.is_empty());
    assert_eq!(table.capacity(), 64);
    assert_eq!(table.initial_capacity(), 64);
    assert_eq!(table.get("Simba"), None);
}

// =============================================================================
// Probe Step Tests
// =============================================================================

#[test]
fn test_zero_step_rejected() {
    assert!(matches!(ProbeStep::new(0), Err(MenagerieError::Config(_))));
}

#[test]
fn test_capacity_made_coprime_with_step() {
    let table = HashIndex::with_step(12, ProbeStep::DEFAULT);
    assert_eq!(table.capacity(), 13);

    let table = HashIndex::with_step(10, ProbeStep::new(5).unwrap());
    assert_eq!(table.capacity(), 11);
}

#[test]
fn test_full_coverage_with_coprime_capacity() {
    // Single-byte keys crowd slots 1..=12 and overlap on their probe chains
    let mut table = HashIndex::with_step(16, ProbeStep::new(3).unwrap());
    let keys: Vec<String> = (0..12).map(|i| format!("{}", (b'a' + i) as char)).collect();
    for (row, key) in keys.iter().enumerate() {
        table.insert(key, row).unwrap();
    }

    for (row, key) in keys.iter().enumerate() {
        let outcome = table.search(key);
        assert_eq!(outcome.row, Some(row));
        assert!(outcome.steps <= table.capacity());
    }
    table.check_invariants().unwrap();
}

// =============================================================================
// Diagnostics Tests
// =============================================================================

#[test]
fn test_print_lists_every_slot() {
    let mut table = HashIndex::new(16);
    table.insert("a", 0).unwrap();
    table.insert("q", 1).unwrap();
    table.remove("a");

    let mut out = Vec::new();
    table.print(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Capacity: 16, Size: 1"));
    assert!(text.contains("Slot   1: tombstone"));
    assert!(text.contains("Slot   4: key=q, row=1, hash=1"));
    assert_eq!(text.matches("Slot ").count(), 16);
}

#[test]
fn test_entries_in_slot_order() {
    let mut table = HashIndex::new(16);
    table.insert("q", 1).unwrap();
    table.insert("a", 0).unwrap();

    let entries: Vec<(&str, usize)> = table.entries().collect();
    assert_eq!(entries, vec![("q", 1), ("a", 0)]);
}
