//! Save states for the simulated hardware.
//!
//! Captures the full simulated board state to a file using bincode
//! serialization with deflate compression, so a test run can be frozen
//! and resumed (or replayed against a different data directory).
//!
//! ## File format
//!
//! ```text
//! +------------------+
//! | Magic "BVSS"     |  4 bytes
//! +------------------+
//! | Format version   |  u32 little-endian (currently 1)
//! +------------------+
//! | Compressed data  |  deflate-compressed bincode payload
//! +------------------+
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::csv::Row;
use crate::error::SimError;

/// Magic bytes identifying a simulator save state file.
const MAGIC: &[u8; 4] = b"BVSS";
/// Current save state format version.
const FORMAT_VERSION: u32 = 1;

// ─── Per-peripheral state structs ───────────────────────────────────────────

/// Physical contents of the fault log, stale tail included.
#[derive(Serialize, Deserialize)]
pub struct EepromState {
    pub rows: Vec<Row>,
}

#[derive(Serialize, Deserialize)]
pub struct PllState {
    pub frequency: u32,
}

// ─── Top-level save state ───────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct SaveState {
    pub eeprom: EepromState,
    pub pll: PllState,
}

// ─── File I/O ───────────────────────────────────────────────────────────────

/// Save state to file with header and deflate compression.
pub fn save_to_file(state: &SaveState, path: &Path) -> Result<(), SimError> {
    let payload = bincode::serialize(state)?;

    let compressed = miniz_oxide::deflate::compress_to_vec(&payload, 6);

    let mut out = Vec::with_capacity(8 + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&compressed);

    std::fs::write(path, &out)?;
    Ok(())
}

/// Load state from file, verifying magic and version.
pub fn load_from_file(path: &Path) -> Result<SaveState, SimError> {
    let data = std::fs::read(path)?;

    if data.len() < 8 {
        return Err(SimError::TruncatedState);
    }
    if &data[0..4] != MAGIC {
        return Err(SimError::BadMagic);
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != FORMAT_VERSION {
        return Err(SimError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let payload = miniz_oxide::inflate::decompress_to_vec(&data[8..])
        .map_err(|e| SimError::Decompress(format!("{:?}", e)))?;

    Ok(bincode::deserialize(&payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SaveState {
        SaveState {
            eeprom: EepromState {
                rows: vec![
                    vec!["0x01".to_string()],
                    vec!["0xff".to_string()],
                    vec!["0x10".to_string()],
                ],
            },
            pll: PllState { frequency: 16_000_000 },
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.state");
        save_to_file(&sample_state(), &path).unwrap();

        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded.eeprom.rows.len(), 3);
        assert_eq!(loaded.eeprom.rows[0], vec!["0x01"]);
        assert_eq!(loaded.pll.frequency, 16_000_000);
    }

    #[test]
    fn test_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.state");
        std::fs::write(&path, b"NOPE\x01\x00\x00\x00somebytes").unwrap();
        assert!(matches!(load_from_file(&path), Err(SimError::BadMagic)));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.state");
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&99u32.to_le_bytes());
        std::fs::write(&path, &data).unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(SimError::UnsupportedVersion { found: 99, expected: 1 })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.state");
        std::fs::write(&path, b"BVS").unwrap();
        assert!(matches!(load_from_file(&path), Err(SimError::TruncatedState)));
    }
}
