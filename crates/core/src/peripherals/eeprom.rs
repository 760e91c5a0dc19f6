//! EEPROM fault log emulation.
//!
//! The real board stores safety-critical fault history in an I2C-attached
//! M24128 EEPROM. The simulation replaces it with a CSV file: one fault-code
//! token per row (e.g. `0x01`), terminated by a `0xff` sentinel row. Rows
//! after the sentinel are stale leftovers from earlier, longer logs.
//!
//! Reads take an exclusive advisory lock on the file for their whole
//! duration, so cooperating producers never expose a half-written row.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, FromRepr};

use crate::csv::{self, Row};
use crate::error::SimError;

/// Sentinel token marking the logical end of valid fault data.
pub const TERMINATOR: &str = "0xff";

// ─── Fault codes ────────────────────────────────────────────────────────────

/// Fault and data codes logged to the EEPROM, one byte each.
///
/// The discriminant is the code byte as it appears on the wire; the strum
/// name matches the firmware's identifier for the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
    Display, EnumString, FromRepr)]
#[repr(u8)]
pub enum FaultCode {
    #[strum(serialize = "FAULT_HIGH_TEMP")]
    HighTemp = 0x01,
    #[strum(serialize = "FAULT_HIGH_VOLT")]
    HighVolt = 0x02,
    #[strum(serialize = "FAULT_LOW_VOLT")]
    LowVolt = 0x04,
    #[strum(serialize = "FAULT_HIGH_CURRENT")]
    HighCurrent = 0x08,
    #[strum(serialize = "FAULT_WATCHDOG")]
    Watchdog = 0x10,
    #[strum(serialize = "FAULT_CAN_BUS")]
    CanBus = 0x20,
    #[strum(serialize = "FAULT_VOLT_MISC")]
    VoltMisc = 0x40,
    #[strum(serialize = "DATA_SOC")]
    Soc = 0x80,
}

impl FaultCode {
    /// Parse a CSV token like `"0x04"` into its fault code.
    ///
    /// Unknown bytes and malformed tokens are rejected at lookup time.
    pub fn from_token(token: &str) -> Result<Self, SimError> {
        let trimmed = token.trim();
        trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .and_then(Self::from_repr)
            .ok_or_else(|| SimError::UnknownFaultCode(token.to_string()))
    }

    /// The CSV token for this code, e.g. `"0x04"`.
    pub fn token(self) -> String {
        format!("0x{:02x}", self as u8)
    }
}

// ─── Read results ───────────────────────────────────────────────────────────

/// Result of an EEPROM read.
///
/// An empty backing file means no producer has logged anything yet, which
/// the harness treats as a distinct state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EepromData {
    /// The backing file is empty.
    Empty,
    /// Fault records in log order, raw CSV tokens.
    Records(Vec<Row>),
}

impl EepromData {
    /// The records, or an empty slice for [`EepromData::Empty`].
    pub fn records(&self) -> &[Row] {
        match self {
            EepromData::Empty => &[],
            EepromData::Records(rows) => rows,
        }
    }

    /// Translate each record's code token into its [`FaultCode`] name.
    pub fn decode(&self) -> Result<Vec<FaultCode>, SimError> {
        self.records()
            .iter()
            .map(|row| {
                let token = row.first().map(String::as_str).unwrap_or("");
                FaultCode::from_token(token)
            })
            .collect()
    }
}

impl fmt::Display for EepromData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EepromData::Empty => f.write_str("No EEPROM data"),
            EepromData::Records(rows) => {
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[{}]", row.join(", "))?;
                }
                write!(f, "]")
            }
        }
    }
}

// ─── The peripheral ─────────────────────────────────────────────────────────

/// CSV-backed fault log EEPROM, read over a simulated I2C bus.
///
/// The log file is produced by the firmware side of the harness; this
/// peripheral only reads it.
pub struct Eeprom {
    path: PathBuf,
}

impl Eeprom {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Eeprom { path: path.into() }
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dump the whole fault log, stopping before the terminator row.
    ///
    /// An empty backing file yields [`EepromData::Empty`]. A missing file is
    /// an I/O error: the harness creates the file before the readers run.
    pub fn dump(&self) -> Result<EepromData, SimError> {
        if self.file_is_empty()? {
            return Ok(EepromData::Empty);
        }
        let rows = self.raw_rows()?;
        let mut records = Vec::new();
        for row in rows {
            if is_terminator(&row) {
                break;
            }
            records.push(row);
        }
        Ok(EepromData::Records(records))
    }

    /// Read records starting at a zero-based row index, as an I2C register
    /// read would.
    ///
    /// Scanning stops at the terminator row; a start address past the
    /// terminator scans the stale tail. A start address at or past the
    /// physical row count is [`SimError::AddressOutOfRange`].
    pub fn read(&self, start_address: usize) -> Result<EepromData, SimError> {
        if self.file_is_empty()? {
            return Ok(EepromData::Empty);
        }
        let rows = self.raw_rows()?;
        if start_address >= rows.len() {
            return Err(SimError::AddressOutOfRange {
                addr: start_address,
                len: rows.len(),
            });
        }
        let mut records = Vec::new();
        for row in &rows[start_address..] {
            if is_terminator(row) {
                break;
            }
            records.push(row.clone());
        }
        Ok(EepromData::Records(records))
    }

    /// The entire physical row sequence, terminator and stale tail included.
    ///
    /// Used for state capture; `dump`/`read` apply the terminator logic on
    /// top of this. Holds the advisory lock for the whole read.
    pub fn raw_rows(&self) -> Result<Vec<Row>, SimError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = File::open(&self.path)?;
        file.lock()?;
        let rows = csv::read_rows(&mut file);
        file.unlock()?;
        Ok(rows?)
    }

    fn file_is_empty(&self) -> Result<bool, SimError> {
        Ok(fs::metadata(&self.path)?.len() == 0)
    }
}

fn is_terminator(row: &Row) -> bool {
    row.len() == 1 && row[0] == TERMINATOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_with(contents: &str) -> (tempfile::TempDir, Eeprom) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("I2C.csv");
        fs::write(&path, contents).unwrap();
        (dir, Eeprom::new(path))
    }

    const SAMPLE: &str = "0x01\n0x02\n0xff\n0x10\n";

    #[test]
    fn test_empty_file() {
        let (_dir, eeprom) = log_with("");
        let dump = eeprom.dump().unwrap();
        assert_eq!(dump, EepromData::Empty);
        assert_eq!(dump.to_string(), "No EEPROM data");
        assert_eq!(eeprom.read(0).unwrap(), EepromData::Empty);
    }

    #[test]
    fn test_dump_stops_at_terminator() {
        let (_dir, eeprom) = log_with(SAMPLE);
        let dump = eeprom.dump().unwrap();
        assert_eq!(dump.records(), &[vec!["0x01".to_string()], vec!["0x02".to_string()]]);
        assert_eq!(dump.to_string(), "[[0x01], [0x02]]");
    }

    #[test]
    fn test_read_from_start_address() {
        let (_dir, eeprom) = log_with(SAMPLE);
        let data = eeprom.read(1).unwrap();
        assert_eq!(data.records(), &[vec!["0x02".to_string()]]);
    }

    #[test]
    fn test_read_past_terminator_scans_stale_tail() {
        let (_dir, eeprom) = log_with(SAMPLE);
        let data = eeprom.read(3).unwrap();
        assert_eq!(data.records(), &[vec!["0x10".to_string()]]);
    }

    #[test]
    fn test_read_out_of_range() {
        let (_dir, eeprom) = log_with(SAMPLE);
        let err = eeprom.read(4).unwrap_err();
        assert!(matches!(err, SimError::AddressOutOfRange { addr: 4, len: 4 }));
    }

    #[test]
    fn test_terminator_only_log() {
        let (_dir, eeprom) = log_with("0xff\n");
        let dump = eeprom.dump().unwrap();
        assert_eq!(dump, EepromData::Records(vec![]));
        assert_eq!(dump.to_string(), "[]");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let eeprom = Eeprom::new(dir.path().join("absent.csv"));
        assert!(matches!(eeprom.dump(), Err(SimError::Io(_))));
    }

    #[test]
    fn test_decode_fault_names() {
        let (_dir, eeprom) = log_with(SAMPLE);
        let codes = eeprom.dump().unwrap().decode().unwrap();
        assert_eq!(codes, vec![FaultCode::HighTemp, FaultCode::HighVolt]);
        assert_eq!(codes[0].to_string(), "FAULT_HIGH_TEMP");
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert!(matches!(
            FaultCode::from_token("0x03"),
            Err(SimError::UnknownFaultCode(_))
        ));
        assert!(FaultCode::from_token("garbage").is_err());
        assert!(FaultCode::from_token("").is_err());
    }

    #[test]
    fn test_token_round_trip() {
        assert_eq!(FaultCode::Soc.token(), "0x80");
        assert_eq!(FaultCode::from_token("0x80").unwrap(), FaultCode::Soc);
    }
}
