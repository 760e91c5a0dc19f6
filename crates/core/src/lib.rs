//! # bms-sim-core
//!
//! File-backed peripheral simulation core for a battery management system
//! (BMS) test harness.
//!
//! The harness runs BMS firmware against simulated hardware: each board
//! peripheral persists its state to a flat CSV file in a shared data
//! directory, so the firmware under test and the simulator driver can
//! inspect and mutate hardware-like state without a real board.
//!
//! ## Architecture
//!
//! - [`Simulator`] — Top-level simulator that wires the peripherals to a
//!   data directory and snapshots their combined state
//! - [`peripherals::Eeprom`] — I2C-attached fault log EEPROM (CSV-backed,
//!   advisory-locked reads)
//! - [`peripherals::Pll`] — PLL clock frequency register (CSV-backed, with
//!   an in-memory mirror)
//! - [`savestate`] — Whole-simulator state capture to a compressed file
//! - [`csv`] — Minimal reader/writer for the flat CSV files
//!
//! All I/O is synchronous and blocking; the driver is single-threaded.

pub mod csv;
pub mod error;
pub mod peripherals;
pub mod savestate;

use std::fs;
use std::path::Path;

pub use error::SimError;
pub use peripherals::{Eeprom, EepromData, FaultCode, Pll, DEFAULT_CLOCK_HZ, TERMINATOR};
pub use savestate::SaveState;

use savestate::{EepromState, PllState};

/// Fault log CSV file name inside the data directory.
pub const I2C_CSV_FILE: &str = "I2C.csv";
/// PLL register CSV file name inside the data directory.
pub const PLL_CSV_FILE: &str = "PLL.csv";

/// Top-level simulator: the peripherals of one simulated board, sharing a
/// data directory.
pub struct Simulator {
    pub eeprom: Eeprom,
    pub pll: Pll,
}

impl Simulator {
    /// Wire the peripherals to their canonical CSV files under `data_dir`.
    ///
    /// The files themselves are created by the harness (or by
    /// [`Simulator::apply_state`]), not here.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Simulator {
            eeprom: Eeprom::new(dir.join(I2C_CSV_FILE)),
            pll: Pll::new(dir.join(PLL_CSV_FILE)),
        }
    }

    /// Capture the current simulated hardware state.
    ///
    /// The fault log is captured physically (terminator and stale tail
    /// included) so applying the state reproduces the file byte-for-row.
    pub fn save_state(&self) -> Result<SaveState, SimError> {
        Ok(SaveState {
            eeprom: EepromState { rows: self.eeprom.raw_rows()? },
            pll: PllState { frequency: self.pll.frequency() },
        })
    }

    /// Restore a captured state into this simulator's data directory.
    pub fn apply_state(&mut self, state: &SaveState) -> Result<(), SimError> {
        if let Some(dir) = self.eeprom.path().parent() {
            fs::create_dir_all(dir)?;
        }
        csv::write_rows(self.eeprom.path(), &state.eeprom.rows)?;
        self.pll.change_frequency(state.pll.frequency)
    }
}
