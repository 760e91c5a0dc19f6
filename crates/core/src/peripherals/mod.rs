//! Simulated BMS board peripherals.
//!
//! Each peripheral stands in for a piece of real hardware on the battery
//! management board, persisting its state to a flat CSV file so the
//! simulator driver and the firmware under test can share it:
//!
//! - [`Eeprom`] — I2C-attached fault log EEPROM (M24128), read-only here
//! - [`Pll`] — PLL clock frequency register with an in-memory mirror

mod eeprom;
mod pll;

pub use eeprom::{Eeprom, EepromData, FaultCode, TERMINATOR};
pub use pll::{Pll, DEFAULT_CLOCK_HZ};
