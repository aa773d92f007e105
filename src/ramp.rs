//! Voltage ramp profiles
//!
//! The ramp (minimum voltage and linear step) of a FAN53555-family part is
//! selected by vendor together with the DIE_ID and DIE_REV nibbles. Several
//! (vendor, die id) pairs appear more than once, so lookup is a first-match
//! scan over [`RAMP_PROFILES`] and the table order is significant: an entry
//! with `check_rev == false` shadows every later entry for the same pair.
//!
//! The codec converts between microvolts and selector codes. Decoding masks
//! the raw register with [`FAN53555_VSEL_READ_MASK`] (6 bits) while the
//! driver writes through [`FAN53555_VSEL_WRITE_MASK`] (7 bits); the two
//! widths differ on the hardware this driver was written against and are
//! kept as they are.

use crate::registers::*;
use crate::types::Vendor;

/// Linear voltage ramp of one chip option
///
/// Only the entries of [`RAMP_PROFILES`] exist, so the step is never zero
/// and the top of the ramp fits in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampProfile {
    pub(crate) vendor: Vendor,
    /// DIE_ID nibble
    pub(crate) die_id: u8,
    /// DIE_REV nibble
    pub(crate) die_rev: u8,
    /// Whether `die_rev` takes part in matching
    pub(crate) check_rev: bool,
    /// Voltage at code 0, in uV
    pub(crate) vsel_min_uv: u32,
    /// Voltage increment per code, in uV
    pub(crate) vsel_step_uv: u32,
}

const fn profile(
    vendor: Vendor,
    die_id: u8,
    die_rev: u8,
    check_rev: bool,
    vsel_min_uv: u32,
    vsel_step_uv: u32,
) -> RampProfile {
    RampProfile {
        vendor,
        die_id,
        die_rev,
        check_rev,
        vsel_min_uv,
        vsel_step_uv,
    }
}

/// Known chip options, in match order
pub static RAMP_PROFILES: [RampProfile; 12] = [
    // Option 00
    profile(Vendor::Fairchild, 0x0, 0x3, true, 600_000, 10_000),
    // Option 13
    profile(Vendor::Fairchild, 0x0, 0xF, true, 800_000, 10_000),
    // Option 23
    profile(Vendor::Fairchild, 0x0, 0xC, true, 600_000, 12_500),
    // Option 01
    profile(Vendor::Fairchild, 0x1, 0x3, true, 600_000, 10_000),
    // Option 03
    profile(Vendor::Fairchild, 0x3, 0x3, true, 600_000, 10_000),
    // Option 04
    profile(Vendor::Fairchild, 0x4, 0xF, true, 603_000, 12_826),
    // Option 05
    profile(Vendor::Fairchild, 0x5, 0x3, true, 600_000, 10_000),
    // Option 08
    profile(Vendor::Fairchild, 0x8, 0x1, true, 600_000, 10_000),
    // Option 08
    profile(Vendor::Fairchild, 0x8, 0xF, true, 600_000, 10_000),
    // Option 09
    profile(Vendor::Fairchild, 0xC, 0xF, true, 603_000, 12_826),
    // SYL82X
    profile(Vendor::Silergy, 0x8, 0x0, false, 712_500, 12_500),
    // SYL83X
    profile(Vendor::Silergy, 0x9, 0x0, false, 712_500, 12_500),
];

/// Lookup failure; carries the queried nibbles for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnsupportedVariant {
    pub die_id: u8,
    pub die_rev: u8,
}

/// Find the ramp of a chip option
pub fn resolve(
    vendor: Vendor,
    die_id: u8,
    die_rev: u8,
) -> Result<&'static RampProfile, UnsupportedVariant> {
    resolve_in(&RAMP_PROFILES, vendor, die_id, die_rev)
}

fn resolve_in<'a>(
    table: &'a [RampProfile],
    vendor: Vendor,
    die_id: u8,
    die_rev: u8,
) -> Result<&'a RampProfile, UnsupportedVariant> {
    table
        .iter()
        .find(|p| p.matches(vendor, die_id, die_rev))
        .ok_or(UnsupportedVariant { die_id, die_rev })
}

impl RampProfile {
    /// Number of selectable codes
    pub const N_VOLTAGES: u8 = FAN53555_N_VOLTAGES;

    fn matches(&self, vendor: Vendor, die_id: u8, die_rev: u8) -> bool {
        self.vendor == vendor && self.die_id == die_id && (!self.check_rev || self.die_rev == die_rev)
    }

    /// Decode a raw selector register value to uV. Bits 6 and 7 are ignored.
    pub fn to_voltage(&self, raw: u8) -> u32 {
        self.vsel_min_uv + (raw & FAN53555_VSEL_READ_MASK) as u32 * self.vsel_step_uv
    }

    /// Encode uV to a selector code, truncating toward zero.
    ///
    /// Not range checked: voltages off the ramp wrap when truncated to the
    /// register field. Use [`RampProfile::contains`] first if that matters.
    pub fn to_code(&self, uv: u32) -> u8 {
        ((uv as i64 - self.vsel_min_uv as i64) / self.vsel_step_uv as i64) as u8
    }

    /// Vendor of the chip option
    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// DIE_ID nibble of the chip option
    pub fn die_id(&self) -> u8 {
        self.die_id
    }

    /// DIE_REV nibble; only meaningful when [`check_rev`](Self::check_rev) is set
    pub fn die_rev(&self) -> u8 {
        self.die_rev
    }

    /// Whether the die revision takes part in matching
    pub fn check_rev(&self) -> bool {
        self.check_rev
    }

    /// Lowest voltage of the ramp, in uV
    pub fn min_uv(&self) -> u32 {
        self.vsel_min_uv
    }

    /// Voltage increment per code, in uV
    pub fn step_uv(&self) -> u32 {
        self.vsel_step_uv
    }

    /// Highest voltage reachable with a 6-bit code, in uV
    pub fn max_uv(&self) -> u32 {
        self.to_voltage(Self::N_VOLTAGES - 1)
    }

    /// Whether `uv` encodes to a code inside the ramp
    pub fn contains(&self, uv: u32) -> bool {
        uv >= self.min_uv() && (uv - self.vsel_min_uv) / self.vsel_step_uv < Self::N_VOLTAGES as u32
    }

    /// Voltage of `code`, `None` past the end of the ramp
    pub fn list_voltage(&self, code: u8) -> Option<u32> {
        (code < Self::N_VOLTAGES).then(|| self.to_voltage(code))
    }
}
