//! Error types for FAN53555 operations
//!
//! Only failures that stop the regulator from becoming operational are
//! reported here. Calibration problems are absorbed and show up in
//! [`CalibrationReport`](crate::CalibrationReport) instead.

use core::fmt;

/// Error types for FAN53555 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// No ramp profile matches the die id / die revision read at probe
    UnsupportedVariant {
        /// Lower nibble of ID1
        die_id: u8,
        /// Lower nibble of ID2
        die_rev: u8,
    },
    /// The configured suspend voltage selector names neither VSEL0 nor VSEL1
    InvalidConfiguration,
    /// Requested voltage is outside the ramp of the detected chip
    InvalidVoltage,
    /// Voltage access before a successful probe
    NotProbed,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::UnsupportedVariant { die_id, die_rev } => {
                write!(f, "die id {} rev {} not supported", die_id, die_rev)
            }
            Error::InvalidConfiguration => f.write_str("invalid suspend voltage selector"),
            Error::InvalidVoltage => f.write_str("voltage outside regulator ramp"),
            Error::NotProbed => f.write_str("regulator not probed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::I2c(e) => defmt::write!(f, "I2C error: {:?}", defmt::Debug2Format(e)),
            Error::UnsupportedVariant { die_id, die_rev } => {
                defmt::write!(f, "die id {} rev {} not supported", die_id, die_rev)
            }
            Error::InvalidConfiguration => defmt::write!(f, "invalid suspend voltage selector"),
            Error::InvalidVoltage => defmt::write!(f, "voltage outside regulator ramp"),
            Error::NotProbed => defmt::write!(f, "regulator not probed"),
        }
    }
}
