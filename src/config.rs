//! Configuration for Menagerie
//!
//! Centralized configuration with sensible defaults.

use crate::date::YearWindow;
use crate::error::{MenagerieError, Result};

/// Main configuration for a Menagerie catalog
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Hash Index Configuration
    // -------------------------------------------------------------------------
    /// Slot count the primary index starts with and never shrinks below
    pub hash_initial_capacity: usize,

    /// Linear probing step: slot_i = (h + step * i) mod capacity
    pub probe_step: usize,

    // -------------------------------------------------------------------------
    // Validation Configuration
    // -------------------------------------------------------------------------
    /// Years accepted by date validation
    pub date_window: YearWindow,

    /// Upper bound for a single feeding's quantity
    pub max_feeding_quantity: i64,

    // -------------------------------------------------------------------------
    // Import Configuration
    // -------------------------------------------------------------------------
    /// Stop reading a text file after this many accepted lines
    pub max_import_lines: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_initial_capacity: 16,
            probe_step: 3,
            date_window: YearWindow::default(),
            max_feeding_quantity: 1000,
            max_import_lines: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the indexes cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.hash_initial_capacity == 0 {
            return Err(MenagerieError::Config(
                "hash_initial_capacity must be positive".to_string(),
            ));
        }
        if self.probe_step == 0 {
            return Err(MenagerieError::Config(
                "probe_step must be positive".to_string(),
            ));
        }
        if self.date_window.min > self.date_window.max {
            return Err(MenagerieError::Config(format!(
                "date window {}..={} is empty",
                self.date_window.min, self.date_window.max
            )));
        }
        if self.max_feeding_quantity < 1 {
            return Err(MenagerieError::Config(
                "max_feeding_quantity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the initial (and minimum) hash index capacity
    pub fn hash_initial_capacity(mut self, capacity: usize) -> Self {
        self.config.hash_initial_capacity = capacity;
        self
    }

    /// Set the linear probing step
    pub fn probe_step(mut self, step: usize) -> Self {
        self.config.probe_step = step;
        self
    }

    /// Set the accepted year window for dates
    pub fn date_window(mut self, window: YearWindow) -> Self {
        self.config.date_window = window;
        self
    }

    /// Set the largest accepted feeding quantity
    pub fn max_feeding_quantity(mut self, max: i64) -> Self {
        self.config.max_feeding_quantity = max;
        self
    }

    /// Limit the number of lines accepted per imported file
    pub fn max_import_lines(mut self, lines: usize) -> Self {
        self.config.max_import_lines = Some(lines);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
