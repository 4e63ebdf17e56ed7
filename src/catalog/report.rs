//! Feeding reports
//!
//! Result of a date-driven query, optionally narrowed by species and by
//! feeding quantity.

use std::fmt;

use crate::date::DateKey;

/// One feeding in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub nickname: String,
    pub species: String,
    pub quantity: i64,
}

/// Feedings recorded on one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedingReport {
    pub date: DateKey,

    /// Species filter, if any
    pub species: Option<String>,

    /// Exact-quantity filter, if any
    pub quantity: Option<i64>,

    /// Matching feedings in date-index bucket order
    pub rows: Vec<ReportRow>,
}

impl FeedingReport {
    /// Sum of quantities over all rows
    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|row| row.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for FeedingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const W_NICKNAME: usize = 20;
        const W_SPECIES: usize = 20;
        const W_QUANTITY: usize = 10;

        writeln!(f, "Feeding report for {}", self.date)?;
        if let Some(species) = &self.species {
            writeln!(f, "Species: {}", species)?;
        }
        if let Some(quantity) = self.quantity {
            writeln!(f, "Quantity: {}", quantity)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<nw$} | {:<sw$} | {:>qw$}",
            "Nickname",
            "Species",
            "Quantity",
            nw = W_NICKNAME,
            sw = W_SPECIES,
            qw = W_QUANTITY
        )?;
        writeln!(
            f,
            "{}-+-{}-+-{}",
            "-".repeat(W_NICKNAME),
            "-".repeat(W_SPECIES),
            "-".repeat(W_QUANTITY)
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<nw$} | {:<sw$} | {:>qw$}",
                row.nickname,
                row.species,
                row.quantity,
                nw = W_NICKNAME,
                sw = W_SPECIES,
                qw = W_QUANTITY
            )?;
        }
        writeln!(
            f,
            "{:<width$} | {:>qw$}",
            "TOTAL",
            self.total_quantity(),
            width = W_NICKNAME + 3 + W_SPECIES,
            qw = W_QUANTITY
        )?;
        write!(f, "Rows: {}", self.rows.len())
    }
}
