//! Error type shared by all simulated peripherals.
//!
//! The simulation keeps its error surface small: "file empty" is a value,
//! not an error (see [`crate::peripherals::EepromData`]), so the variants
//! here cover only real failures — I/O, malformed CSV content, and save
//! state files that cannot be decoded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A range read started at or past the number of rows in the log.
    #[error("nothing in the EEPROM at address {addr} yet ({len} rows)")]
    AddressOutOfRange { addr: usize, len: usize },

    /// A fault-log token did not map to any known fault code.
    #[error("unknown fault code token: {0:?}")]
    UnknownFaultCode(String),

    /// The PLL backing file did not contain a single integer row.
    #[error("malformed frequency row: {0:?}")]
    MalformedFrequency(String),

    #[error("state serialization error: {0}")]
    State(#[from] bincode::Error),

    #[error("invalid save state file (bad magic)")]
    BadMagic,

    #[error("unsupported save state version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("save state file truncated")]
    TruncatedState,

    #[error("decompress error: {0}")]
    Decompress(String),
}
