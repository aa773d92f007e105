//! Type definitions and configuration for FAN53555-family regulators
//!
//! This module provides strongly-typed identifiers for the chip vendor and
//! the two voltage selector registers, plus the driver configuration.

use crate::ramp::RampProfile;
use crate::registers::*;

/// Chip vendor, taken from the compatible the driver was bound with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Vendor {
    /// Fairchild / onsemi FAN53555
    Fairchild,
    /// Silergy SYR82x / SYR83x and the RK860 second sources
    Silergy,
}

impl Vendor {
    /// Whether parts from this vendor may need RK860 trim calibration
    pub fn supports_rk860_calibration(self) -> bool {
        matches!(self, Vendor::Silergy)
    }
}

/// Regulator kind reported to the host framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegulatorKind {
    Buck,
}

/// Voltage selector registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VoltageSelector {
    Vsel0 = FAN53555_VSEL0,
    Vsel1 = FAN53555_VSEL1,
}

impl VoltageSelector {
    /// Map a raw selector id (as found in board configuration)
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(VoltageSelector::Vsel0),
            1 => Some(VoltageSelector::Vsel1),
            _ => None,
        }
    }

    /// Register offset of this selector
    pub fn register(self) -> u8 {
        self as u8
    }

    /// The other selector of the pair
    pub fn other(self) -> Self {
        match self {
            VoltageSelector::Vsel0 => VoltageSelector::Vsel1,
            VoltageSelector::Vsel1 => VoltageSelector::Vsel0,
        }
    }
}

/// Which selector is the normal operating one and which holds the suspend
/// voltage. The two are always distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectorRoles {
    active: VoltageSelector,
    sleep: VoltageSelector,
}

impl SelectorRoles {
    /// Derive the roles from the suspend selector
    pub fn from_sleep(sleep: VoltageSelector) -> Self {
        Self {
            active: sleep.other(),
            sleep,
        }
    }

    /// Selector used in normal mode
    pub fn active(&self) -> VoltageSelector {
        self.active
    }

    /// Selector used in suspend
    pub fn sleep(&self) -> VoltageSelector {
        self.sleep
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// I2C address of the regulator
    pub address: u8,
    /// Raw suspend voltage selector id; 0 selects VSEL0, 1 selects VSEL1
    pub suspend_voltage_selector: u32,
    /// Run RK860 trim calibration at probe for vendors that need it
    pub calibrate: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            address: FAN53555_SLAVE_ADDRESS,
            suspend_voltage_selector: FAN53555_VSEL1 as u32,
            calibrate: true,
        }
    }

    /// Set the I2C address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the raw suspend voltage selector id
    pub fn with_suspend_voltage_selector(mut self, raw: u32) -> Self {
        self.suspend_voltage_selector = raw;
        self
    }

    /// Enable or disable RK860 calibration
    pub fn with_calibration(mut self, calibrate: bool) -> Self {
        self.calibrate = calibrate;
        self
    }

    /// Resolve the selector roles, `None` if the raw id is unknown
    pub fn selector_roles(&self) -> Option<SelectorRoles> {
        VoltageSelector::from_raw(self.suspend_voltage_selector).map(SelectorRoles::from_sleep)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Identification captured at probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipInfo {
    pub vendor: Vendor,
    pub die_id: u8,
    pub die_rev: u8,
    pub profile: &'static RampProfile,
}
