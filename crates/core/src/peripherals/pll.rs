//! PLL clock frequency emulation.
//!
//! The real board derives its system core clock from a PLL; the simulation
//! reduces that to one `u32` Hz value held in the peripheral and mirrored
//! to a single-row CSV file that the firmware side reads back.
//!
//! Unlike the EEPROM log, the PLL file is written without any lock, so
//! concurrent writers can interleave. That matches the harness it replaces
//! and is acceptable for a single-threaded driver.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::csv;
use crate::error::SimError;

/// Default system core clock set by `init`: 16 MHz.
pub const DEFAULT_CLOCK_HZ: u32 = 16_000_000;

/// Simulated PLL frequency register.
///
/// The in-memory mirror starts at 0 and tracks the last value written;
/// `init` or `load` establish it from scratch.
pub struct Pll {
    path: PathBuf,
    frequency: u32,
}

impl Pll {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Pll { path: path.into(), frequency: 0 }
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bring the clock up at the default 16 MHz.
    pub fn init(&mut self) -> Result<(), SimError> {
        self.change_frequency(DEFAULT_CLOCK_HZ)
    }

    /// Set a new frequency: overwrite the backing file with a single row,
    /// then update the mirror.
    pub fn change_frequency(&mut self, new_frequency: u32) -> Result<(), SimError> {
        let value = new_frequency.to_string();
        csv::write_row(&self.path, &[value.as_str()])?;
        self.frequency = new_frequency;
        Ok(())
    }

    /// Current frequency in Hz, from the mirror. No file access.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Rewrite the backing file with the current mirror value.
    pub fn flush(&self) -> Result<(), SimError> {
        let value = self.frequency.to_string();
        csv::write_row(&self.path, &[value.as_str()])?;
        Ok(())
    }

    /// Re-read the backing file into the mirror, returning the value.
    pub fn load(&mut self) -> Result<u32, SimError> {
        let mut file = File::open(&self.path)?;
        let rows = csv::read_rows(&mut file)?;
        let field = rows
            .first()
            .and_then(|row| row.first())
            .ok_or_else(|| SimError::MalformedFrequency(String::new()))?;
        let hz = field
            .trim()
            .parse::<u32>()
            .map_err(|_| SimError::MalformedFrequency(field.clone()))?;
        self.frequency = hz;
        Ok(hz)
    }
}
