#![cfg_attr(not(test), no_std)]
//! # FAN53555 Buck Regulator Driver
//!
//! This crate provides an embedded driver for the FAN53555 family of
//! I2C-controlled buck regulators (Fairchild FAN53555, Silergy SYR82x/SYR83x
//! and the Rockchip RK860 second sources). It supports:
//! - Chip identification from the DIE_ID / DIE_REV nibbles
//! - Voltage ramp selection for every known chip option
//! - Normal-mode voltage get/set through VSEL0 or VSEL1
//! - One-time RK860 trim calibration on Silergy boards
//!
//! ## Example
//!
//! ```no_run
//! use fan53555::{Config, Error, Fan53555, Vendor};
//! # use embedded_hal::i2c::I2c;
//! # fn example<I: I2c>(i2c: I) -> Result<(), Error<I::Error>> {
//! // VSEL1 holds the suspend voltage, VSEL0 the normal one
//! let config = Config::default().with_suspend_voltage_selector(1);
//! let mut regulator = Fan53555::new(i2c, Vendor::Silergy, config)?;
//!
//! // Identify the chip and calibrate RK860 parts if needed
//! let profile = regulator.probe()?;
//! let max = profile.max_uv();
//!
//! regulator.set_voltage(900_000u32.min(max))?;
//! let uv = regulator.get_voltage()?;
//! # let _ = uv;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! With the `defmt` feature enabled the driver logs probe results, voltage
//! changes and every step of the calibration through `defmt`.

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod calibration;
mod driver;
mod error;
pub mod ramp;
mod registers;
mod types;

#[cfg(test)]
mod test_bus;

// Re-export main types
pub use calibration::{CalibrationOutcome, CalibrationReport, Detection, Rk860Population};
pub use driver::Fan53555;
pub use error::Error;
pub use ramp::{RampProfile, UnsupportedVariant, RAMP_PROFILES};
pub use registers::*;
pub use types::*;
