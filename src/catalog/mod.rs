//! Catalog Module
//!
//! The zoo catalog: two record stores and the indexes derived from them.
//!
//! ## Responsibilities
//! - Keep every index consistent with the stores
//! - Validate records before they enter a store
//! - Answer lookups through the indexes
//! - Rebuild every index after a structural change (erase, import, load)
//!
//! ## Index Map
//! ```text
//!   animals  ──┬── HashIndex            nickname → row
//!              └── OrderedIndex<String> species  → rows
//!
//!   feedings ──┬── OrderedIndex<String>  nickname → rows
//!              ├── OrderedIndex<i64>     quantity → rows
//!              └── OrderedIndex<DateKey> date     → rows
//! ```

mod report;

pub use report::{FeedingReport, ReportRow};

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::bucket::DuplicateBucket;
use crate::config::Config;
use crate::date::DateKey;
use crate::error::{MenagerieError, Result};
use crate::hash::{HashIndex, ProbeStep};
use crate::store::{snapshot, text, Animal, Feeding, RecordStore};
use crate::tree::OrderedIndex;
use crate::RowId;

/// Selects one index for a debug dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Animal nickname hash index
    Hash,
    /// Animal species tree
    Species,
    /// Feeding nickname tree
    Feedings,
    /// Feeding quantity tree
    Quantity,
    /// Feeding date tree
    Dates,
}

/// Result of a primary-key lookup
#[derive(Debug, Clone, Copy)]
pub struct AnimalLookup<'a> {
    pub row: Option<RowId>,
    pub animal: Option<&'a Animal>,

    /// Slots probed by the hash index
    pub steps: usize,
}

/// Record stores plus their indexes
pub struct Catalog {
    config: Config,

    animals: RecordStore<Animal>,
    feedings: RecordStore<Feeding>,

    /// Animal nickname → row (primary key)
    by_nickname: HashIndex,

    /// Animal species → rows
    by_species: OrderedIndex<String>,

    /// Feeding nickname → rows
    feedings_by_nickname: OrderedIndex<String>,

    /// Feeding quantity → rows
    feedings_by_quantity: OrderedIndex<i64>,

    /// Feeding date → rows
    feedings_by_date: OrderedIndex<DateKey>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let step = ProbeStep::new(config.probe_step)?;
        Ok(Self::empty(config, step))
    }

    /// Create a catalog over existing record arrays and index them
    ///
    /// Later animals repeating a nickname and feedings of unknown animals
    /// are dropped, as on import.
    pub fn from_records(
        config: Config,
        animals: RecordStore<Animal>,
        feedings: RecordStore<Feeding>,
    ) -> Result<Self> {
        let mut catalog = Self::new(config)?;
        catalog.install(animals.into_rows(), feedings.into_rows())?;
        Ok(catalog)
    }

    // =========================================================================
    // Animals
    // =========================================================================

    /// Add an animal with a unique nickname
    pub fn add_animal(&mut self, animal: Animal) -> Result<RowId> {
        check_field("nickname", &animal.nickname)?;
        check_field("species", &animal.species)?;
        check_field("cage", &animal.cage)?;

        if self.by_nickname.contains_key(&animal.nickname) {
            return Err(MenagerieError::DuplicateKey(animal.nickname));
        }

        let row = self.animals.append(animal);
        let animal = &self.animals.as_slice()[row];
        if let Err(e) = self.by_nickname.insert(&animal.nickname, row) {
            self.animals.erase(row);
            return Err(e);
        }
        self.by_species.add(animal.species.clone(), row);

        tracing::debug!(row, nickname = %animal.nickname, "animal added");
        Ok(row)
    }

    /// Remove the animal matching all three fields, with its feedings
    ///
    /// Returns the number of feedings dropped along with it. Row
    /// identifiers shift, so every index is rebuilt.
    pub fn remove_animal(&mut self, nickname: &str, species: &str, cage: &str) -> Result<usize> {
        let row = self
            .by_nickname
            .get(nickname)
            .filter(|&row| {
                self.animals
                    .get(row)
                    .is_some_and(|a| a.species == species && a.cage == cage)
            })
            .ok_or_else(|| {
                MenagerieError::RecordNotFound(format!("animal {} {} {}", nickname, species, cage))
            })?;

        self.animals.erase(row);
        let dropped = self.feedings.retain(|f| f.nickname != nickname);
        self.rebuild_indexes()?;

        tracing::debug!(nickname, feedings_dropped = dropped, "animal removed");
        Ok(dropped)
    }

    /// Primary-key lookup with its probe count
    pub fn find_animal(&self, nickname: &str) -> AnimalLookup<'_> {
        let outcome = self.by_nickname.search(nickname);
        AnimalLookup {
            row: outcome.row,
            animal: outcome.row.and_then(|row| self.animals.get(row)),
            steps: outcome.steps,
        }
    }

    /// Animals of one species, in bucket order
    pub fn animals_of_species(&self, species: &str) -> Vec<(RowId, &Animal)> {
        let rows = self.by_species.search(&species.to_string());
        resolve(&rows, &self.animals)
    }

    // =========================================================================
    // Feedings
    // =========================================================================

    /// Add a feeding for a known animal
    pub fn add_feeding(&mut self, feeding: Feeding) -> Result<RowId> {
        check_field("nickname", &feeding.nickname)?;
        check_field("feed type", &feeding.feed_type)?;
        if !(1..=self.config.max_feeding_quantity).contains(&feeding.quantity) {
            return Err(MenagerieError::InvalidRecord(format!(
                "quantity {} outside 1..={}",
                feeding.quantity, self.config.max_feeding_quantity
            )));
        }
        let date = self.parse_date(&feeding.date)?;
        if !self.by_nickname.contains_key(&feeding.nickname) {
            return Err(MenagerieError::RecordNotFound(format!(
                "animal {}",
                feeding.nickname
            )));
        }

        let row = self.feedings.append(feeding);
        let feeding = &self.feedings.as_slice()[row];
        self.feedings_by_nickname.add(feeding.nickname.clone(), row);
        self.feedings_by_quantity.add(feeding.quantity, row);
        self.feedings_by_date.add(date, row);

        tracing::debug!(row, nickname = %feeding.nickname, "feeding added");
        Ok(row)
    }

    /// Remove the first feeding equal to `feeding`
    pub fn remove_feeding(&mut self, feeding: &Feeding) -> Result<()> {
        let row = self
            .feedings
            .position(|f| f == feeding)
            .ok_or_else(|| MenagerieError::RecordNotFound(format!("feeding {}", feeding)))?;

        self.feedings.erase(row);
        self.rebuild_indexes()?;
        Ok(())
    }

    /// Feedings of one animal, in insertion order
    pub fn feedings_for(&self, nickname: &str) -> Vec<(RowId, &Feeding)> {
        let rows = self.feedings_by_nickname.search(&nickname.to_string());
        resolve(&rows, &self.feedings)
    }

    /// Feedings recorded on `date` (`DD.MM.YYYY`)
    pub fn feedings_on(&self, date: &str) -> Result<Vec<(RowId, &Feeding)>> {
        let key = self.parse_date(date)?;
        let rows = self.feedings_by_date.search(&key);
        Ok(resolve(&rows, &self.feedings))
    }

    /// Feedings recorded between two dates, inclusive, oldest first
    pub fn feedings_between(&self, from: &str, to: &str) -> Result<Vec<(RowId, &Feeding)>> {
        let lo = self.parse_date(from)?;
        let hi = self.parse_date(to)?;
        let rows = self.feedings_by_date.search_in_range(&lo, &hi);
        Ok(resolve(&rows, &self.feedings))
    }

    /// Feedings with exactly `quantity`
    pub fn feedings_with_quantity(&self, quantity: i64) -> Vec<(RowId, &Feeding)> {
        let rows = self.feedings_by_quantity.search(&quantity);
        resolve(&rows, &self.feedings)
    }

    /// Feedings with a quantity in `[lo, hi]`, smallest first
    pub fn feedings_with_quantity_between(&self, lo: i64, hi: i64) -> Vec<(RowId, &Feeding)> {
        let rows = self.feedings_by_quantity.search_in_range(&lo, &hi);
        resolve(&rows, &self.feedings)
    }

    /// Feedings on `date`, optionally narrowed by species and exact quantity
    ///
    /// Feedings whose animal is no longer in the catalog are left out.
    pub fn feeding_report(
        &self,
        date: &str,
        species: Option<&str>,
        quantity: Option<i64>,
    ) -> Result<FeedingReport> {
        let key = self.parse_date(date)?;
        if let Some(q) = quantity {
            if q < 1 {
                return Err(MenagerieError::InvalidRecord(format!(
                    "report quantity {} must be positive",
                    q
                )));
            }
        }

        let mut rows = Vec::new();
        for row in self.feedings_by_date.search(&key).iter() {
            let Some(feeding) = self.feedings.get(row) else {
                continue;
            };
            if quantity.is_some_and(|q| q != feeding.quantity) {
                continue;
            }
            let Some(animal) = self.find_animal(&feeding.nickname).animal else {
                continue;
            };
            if species.is_some_and(|s| s != animal.species) {
                continue;
            }
            rows.push(ReportRow {
                nickname: feeding.nickname.clone(),
                species: animal.species.clone(),
                quantity: feeding.quantity,
            });
        }

        Ok(FeedingReport {
            date: key,
            species: species.map(str::to_string),
            quantity,
            rows,
        })
    }

    // =========================================================================
    // Index Maintenance
    // =========================================================================

    /// Discard and re-populate every index from the stores
    ///
    /// Feedings with an unparseable date stay out of the date index.
    pub fn rebuild_indexes(&mut self) -> Result<()> {
        self.by_nickname.clear();
        self.by_species.clear();
        self.feedings_by_nickname.clear();
        self.feedings_by_quantity.clear();
        self.feedings_by_date.clear();

        for (row, animal) in self.animals.iter() {
            // Stores are filled through add/import, which keep nicknames unique
            if self.by_nickname.contains_key(&animal.nickname) {
                tracing::warn!(
                    row,
                    nickname = %animal.nickname,
                    "duplicate nickname left out of hash index"
                );
            } else {
                self.by_nickname.insert(&animal.nickname, row)?;
            }
            self.by_species.add(animal.species.clone(), row);
        }

        for (row, feeding) in self.feedings.iter() {
            self.feedings_by_nickname.add(feeding.nickname.clone(), row);
            self.feedings_by_quantity.add(feeding.quantity, row);
            match DateKey::parse_within(&feeding.date, self.config.date_window) {
                Ok(date) => self.feedings_by_date.add(date, row),
                Err(e) => tracing::warn!(row, error = %e, "feeding left out of date index"),
            }
        }

        tracing::debug!(
            animals = self.animals.len(),
            feedings = self.feedings.len(),
            hash_capacity = self.by_nickname.capacity(),
            "indexes rebuilt"
        );
        Ok(())
    }

    /// Reset the primary index to a new initial capacity and re-populate it
    pub fn resize_hash(&mut self, new_initial_capacity: usize) -> Result<()> {
        self.by_nickname.resize(new_initial_capacity);
        self.rebuild_indexes()
    }

    /// Drop every record and empty every index
    pub fn clear(&mut self) {
        self.animals.clear();
        self.feedings.clear();
        self.by_nickname.clear();
        self.by_species.clear();
        self.feedings_by_nickname.clear();
        self.feedings_by_quantity.clear();
        self.feedings_by_date.clear();
    }

    /// Check each index's structure and its agreement with the stores
    pub fn check_invariants(&self) -> Result<()> {
        self.by_nickname.check_invariants()?;
        self.by_species.check_invariants()?;
        self.feedings_by_nickname.check_invariants()?;
        self.feedings_by_quantity.check_invariants()?;
        self.feedings_by_date.check_invariants()?;

        for (row, animal) in self.animals.iter() {
            let indexed = self.by_nickname.get(&animal.nickname);
            if indexed != Some(row) {
                return Err(MenagerieError::Invariant(format!(
                    "animal row {} ({}) maps to {:?} in hash index",
                    row, animal.nickname, indexed
                )));
            }
        }
        for (name, count, expected) in [
            ("species", self.by_species.all_indices().size(), self.animals.len()),
            (
                "feeding nickname",
                self.feedings_by_nickname.all_indices().size(),
                self.feedings.len(),
            ),
            (
                "quantity",
                self.feedings_by_quantity.all_indices().size(),
                self.feedings.len(),
            ),
        ] {
            if count != expected {
                return Err(MenagerieError::Invariant(format!(
                    "{} index holds {} rows, store has {}",
                    name, count, expected
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Import / Export
    // =========================================================================

    /// Replace the animals with the content of a text file
    ///
    /// Only the first animal per nickname is kept. Returns the number of
    /// animals accepted.
    pub fn import_animals(&mut self, path: &Path) -> Result<usize> {
        let animals = text::import_file::<Animal>(path, self.config.max_import_lines)?;
        let animals = unique_animals(animals);
        let count = animals.len();
        self.animals.replace(animals);
        self.rebuild_indexes()?;
        Ok(count)
    }

    /// Replace the feedings with the content of a text file
    ///
    /// Feedings of animals missing from the catalog are skipped. Returns the
    /// number of feedings accepted.
    pub fn import_feedings(&mut self, path: &Path) -> Result<usize> {
        let feedings = text::import_file::<Feeding>(path, self.config.max_import_lines)?;
        let feedings = known_feedings(feedings, |nickname| {
            self.by_nickname.contains_key(nickname)
        });
        let count = feedings.len();
        self.feedings.replace(feedings);
        self.rebuild_indexes()?;
        Ok(count)
    }

    pub fn export_animals(&self, path: &Path) -> Result<usize> {
        text::export_file(path, self.animals.as_slice())
    }

    pub fn export_feedings(&self, path: &Path) -> Result<usize> {
        text::export_file(path, self.feedings.as_slice())
    }

    /// Persist both record arrays as a binary snapshot
    pub fn save_snapshot(&self, path: &Path) -> Result<usize> {
        snapshot::save(path, &self.animals, &self.feedings)
    }

    /// Replace both record arrays from a snapshot and re-index
    pub fn load_snapshot(&mut self, path: &Path) -> Result<()> {
        let snapshot = snapshot::load(path)?;
        self.install(snapshot.animals.into_rows(), snapshot.feedings.into_rows())
    }

    // =========================================================================
    // Debug Dumps
    // =========================================================================

    /// Write a diagnostic dump of one index to `out`
    pub fn dump<W: Write>(&self, kind: IndexKind, out: &mut W) -> Result<()> {
        match kind {
            IndexKind::Hash => self.by_nickname.print(out),
            IndexKind::Species => self.by_species.print(out),
            IndexKind::Feedings => self.feedings_by_nickname.print(out),
            IndexKind::Quantity => self.feedings_by_quantity.print(out),
            IndexKind::Dates => self.feedings_by_date.print(out),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn animals(&self) -> &RecordStore<Animal> {
        &self.animals
    }

    pub fn feedings(&self) -> &RecordStore<Feeding> {
        &self.feedings
    }

    pub fn hash_index(&self) -> &HashIndex {
        &self.by_nickname
    }

    pub fn species_index(&self) -> &OrderedIndex<String> {
        &self.by_species
    }

    pub fn feeding_index(&self) -> &OrderedIndex<String> {
        &self.feedings_by_nickname
    }

    pub fn quantity_index(&self) -> &OrderedIndex<i64> {
        &self.feedings_by_quantity
    }

    pub fn date_index(&self) -> &OrderedIndex<DateKey> {
        &self.feedings_by_date
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Empty catalog over an already validated config
    fn empty(config: Config, step: ProbeStep) -> Self {
        Self {
            by_nickname: HashIndex::with_step(config.hash_initial_capacity, step),
            config,
            animals: RecordStore::new(),
            feedings: RecordStore::new(),
            by_species: OrderedIndex::new(),
            feedings_by_nickname: OrderedIndex::new(),
            feedings_by_quantity: OrderedIndex::new(),
            feedings_by_date: OrderedIndex::new(),
        }
    }

    /// Replace both stores with filtered records and re-index
    fn install(&mut self, animals: Vec<Animal>, feedings: Vec<Feeding>) -> Result<()> {
        let animals = unique_animals(animals);
        let feedings = {
            let nicknames: HashSet<&str> = animals.iter().map(|a| a.nickname.as_str()).collect();
            known_feedings(feedings, |nickname| nicknames.contains(nickname))
        };

        self.animals.replace(animals);
        self.feedings.replace(feedings);
        self.rebuild_indexes()
    }

    fn parse_date(&self, date: &str) -> Result<DateKey> {
        DateKey::parse_within(date, self.config.date_window)
    }
}

impl Default for Catalog {
    /// Catalog over `Config::default()`, which always passes validation
    fn default() -> Self {
        Self::empty(Config::default(), ProbeStep::DEFAULT)
    }
}

/// Keep the first animal per nickname
fn unique_animals(animals: Vec<Animal>) -> Vec<Animal> {
    let mut seen = HashSet::new();
    animals
        .into_iter()
        .filter(|animal| {
            let first = seen.insert(animal.nickname.clone());
            if !first {
                tracing::warn!(
                    nickname = %animal.nickname,
                    species = %animal.species,
                    "skipping animal with duplicate nickname"
                );
            }
            first
        })
        .collect()
}

/// Keep the feedings whose animal is known
fn known_feedings<F>(feedings: Vec<Feeding>, is_known: F) -> Vec<Feeding>
where
    F: Fn(&str) -> bool,
{
    feedings
        .into_iter()
        .filter(|feeding| {
            let known = is_known(&feeding.nickname);
            if !known {
                tracing::warn!(
                    nickname = %feeding.nickname,
                    date = %feeding.date,
                    "skipping feeding of unknown animal"
                );
            }
            known
        })
        .collect()
}

/// Fields end up in a whitespace-delimited file, so they must be one token
fn check_field(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MenagerieError::InvalidRecord(format!("{} is empty", name)));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(MenagerieError::InvalidRecord(format!(
            "{} '{}' contains whitespace",
            name, value
        )));
    }
    Ok(())
}

/// Map bucket rows to records; stale rows are skipped
fn resolve<'a, R>(rows: &DuplicateBucket, store: &'a RecordStore<R>) -> Vec<(RowId, &'a R)> {
    rows.iter()
        .filter_map(|row| store.get(row).map(|record| (row, record)))
        .collect()
}
