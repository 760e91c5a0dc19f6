//! Minimal CSV row reader/writer.
//!
//! The simulation files are trivially flat — one record per line, fields
//! separated by commas, no quoting or escaping — so this module parses them
//! directly instead of pulling in a CSV dependency. Files written by the C
//! side of the harness use `\r\n` line endings; both endings are accepted.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A single CSV row: the fields of one line.
pub type Row = Vec<String>;

/// Parse CSV text into rows. Blank lines are skipped.
pub fn parse_rows(text: &str) -> Vec<Row> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(|line| line.split(',').map(|f| f.to_string()).collect())
        .collect()
}

/// Read all rows from an already-open file.
///
/// Takes the handle rather than a path so callers can hold a file lock
/// across the read.
pub fn read_rows(file: &mut File) -> std::io::Result<Vec<Row>> {
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(parse_rows(&text))
}

/// Overwrite `path` with a single CSV row.
pub fn write_row(path: &Path, fields: &[&str]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", fields.join(","))?;
    Ok(())
}

/// Overwrite `path` with a full row sequence.
pub fn write_rows(path: &Path, rows: &[Row]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for row in rows {
        writeln!(file, "{}", row.join(","))?;
    }
    Ok(())
}
