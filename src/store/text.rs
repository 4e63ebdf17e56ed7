//! Flat-text import/export
//!
//! One record per line, fields separated by whitespace:
//! ```text
//! Simba Lion A-12
//! Simba Meat 3 15.01.2024
//! ```
//! Tokens past the expected field count are ignored. Lines that do not
//! parse are skipped and logged.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{MenagerieError, Result};

/// A record with a whitespace-delimited text form
pub trait TextRecord: Sized {
    /// Number of leading tokens a line must provide
    const FIELDS: usize;

    /// Build a record from a line's tokens
    fn from_fields(fields: &[&str]) -> std::result::Result<Self, String>;

    /// Render as a single line (no trailing newline)
    fn to_line(&self) -> String;
}

/// Parse one line; `Ok(None)` for a blank line
///
/// `line_no` is 1-based and only used for the error.
pub fn parse_line<R: TextRecord>(line_no: usize, line: &str) -> Result<Option<R>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    R::from_fields(&fields)
        .map(Some)
        .map_err(|reason| MenagerieError::Parse {
            line: line_no,
            reason,
        })
}

/// Read records from `reader`
///
/// Stops after `max_lines` accepted records when a limit is given.
pub fn read_records<R: TextRecord, B: BufRead>(
    reader: B,
    max_lines: Option<usize>,
) -> Result<Vec<R>> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        if max_lines.is_some_and(|max| records.len() >= max) {
            break;
        }

        match parse_line::<R>(idx + 1, &line?) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                tracing::warn!(error = %e, "skipping malformed line");
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(accepted = records.len(), skipped, "text import finished");
    }

    Ok(records)
}

/// Write one line per record to `writer`
pub fn write_records<'a, R, W, I>(writer: &mut W, records: I) -> Result<usize>
where
    R: TextRecord + 'a,
    W: Write,
    I: IntoIterator<Item = &'a R>,
{
    let mut written = 0;
    for record in records {
        writeln!(writer, "{}", record.to_line())?;
        written += 1;
    }
    Ok(written)
}

/// Read records from the file at `path`
pub fn import_file<R: TextRecord>(path: &Path, max_lines: Option<usize>) -> Result<Vec<R>> {
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file), max_lines)?;
    tracing::info!(path = %path.display(), records = records.len(), "imported records");
    Ok(records)
}

/// Write records to the file at `path`, replacing its content
pub fn export_file<'a, R, I>(path: &Path, records: I) -> Result<usize>
where
    R: TextRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_records(&mut writer, records)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), records = written, "exported records");
    Ok(written)
}
