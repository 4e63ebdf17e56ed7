//! Record definitions
//!
//! The two record shapes kept by a zoo catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::TextRecord;

/// An animal in the reference list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    /// Unique name (primary key)
    pub nickname: String,

    pub species: String,

    /// Enclosure label
    pub cage: String,
}

impl Animal {
    pub fn new(
        nickname: impl Into<String>,
        species: impl Into<String>,
        cage: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            species: species.into(),
            cage: cage.into(),
        }
    }
}

/// One feeding event for an animal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeding {
    /// Nickname of the fed animal
    pub nickname: String,

    pub feed_type: String,

    /// Number of feedings recorded in this entry
    pub quantity: i64,

    /// Display date, `DD.MM.YYYY`
    pub date: String,
}

impl Feeding {
    pub fn new(
        nickname: impl Into<String>,
        feed_type: impl Into<String>,
        quantity: i64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            feed_type: feed_type.into(),
            quantity,
            date: date.into(),
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, cage {})", self.nickname, self.species, self.cage)
    }
}

impl fmt::Display for Feeding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ate {} x{} on {}",
            self.nickname, self.feed_type, self.quantity, self.date
        )
    }
}

impl TextRecord for Animal {
    const FIELDS: usize = 3;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        match fields {
            [nickname, species, cage, ..] => Ok(Animal::new(*nickname, *species, *cage)),
            _ => Err(format!("expected {} fields, got {}", Self::FIELDS, fields.len())),
        }
    }

    fn to_line(&self) -> String {
        format!("{} {} {}", self.nickname, self.species, self.cage)
    }
}

impl TextRecord for Feeding {
    const FIELDS: usize = 4;

    fn from_fields(fields: &[&str]) -> Result<Self, String> {
        match fields {
            [nickname, feed_type, quantity, date, ..] => {
                let quantity = quantity
                    .parse::<i64>()
                    .map_err(|e| format!("bad quantity '{}': {}", quantity, e))?;
                Ok(Feeding::new(*nickname, *feed_type, quantity, *date))
            }
            _ => Err(format!("expected {} fields, got {}", Self::FIELDS, fields.len())),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.nickname, self.feed_type, self.quantity, self.date
        )
    }
}
