//! Register addresses and constants for FAN53555 and RK860
//!
//! This module defines the byte-wide registers of the FAN53555 family, the
//! selector field masks, and the RK860 trim calibration protocol constants.

/// Default I2C address
pub const FAN53555_SLAVE_ADDRESS: u8 = 0x40;

/// Voltage setting register 0
pub const FAN53555_VSEL0: u8 = 0x00;

/// Voltage setting register 1
pub const FAN53555_VSEL1: u8 = 0x01;

/// Control register - mode, slew rate and output discharge
pub const FAN53555_CONTROL: u8 = 0x02;

/// IC type register - vendor bits and DIE_ID in the lower nibble
pub const FAN53555_ID1: u8 = 0x03;

/// IC mask version register - DIE_REV in the lower nibble
pub const FAN53555_ID2: u8 = 0x04;

/// Monitor register - power good and fault status
pub const FAN53555_MONITOR: u8 = 0x05;

/// DIE_ID field of ID1
pub const FAN53555_DIE_ID_MASK: u8 = 0x0F;

/// DIE_REV field of ID2
pub const FAN53555_DIE_REV_MASK: u8 = 0x0F;

/// Selector code as decoded from VSELx (bits 6-7 are flags)
pub const FAN53555_VSEL_READ_MASK: u8 = 0x3F;

/// Selector field as updated in VSELx; bit 7 (BUCK_EN) is preserved
pub const FAN53555_VSEL_WRITE_MASK: u8 = 0x7F;

/// Number of selector codes in a ramp
pub const FAN53555_N_VOLTAGES: u8 = 64;

// RK860 calibration
//
// The values below are opaque vendor protocol constants. They are issued
// exactly as listed, in the order documented on `calibration`.

/// RK860-0 bus address
pub const RK860_0_ADDRESS: u8 = 0x40;

/// RK860-1 bus address
pub const RK860_1_ADDRESS: u8 = 0x41;

/// Commit address written last in dual-chip calibration
pub const RK860_COMMIT_ADDRESS: u8 = 0x42;

/// Trim unlock register
pub const RK860_UNLOCK: u8 = 0x0A;

/// Unlock key
pub const RK860_UNLOCK_KEY: u8 = 0x5A;

/// Trim registers, in snapshot and rewrite order
pub const RK860_TRIM: [u8; 3] = [0x0B, 0x0C, 0x0D];

/// Calibration status register
pub const RK860_STATUS: u8 = 0x0E;

/// Calibration done bit of the status register
pub const RK860_STATUS_CALIBRATED: u8 = 0x04;

/// Status values that identify an RK860-0
pub const RK860_0_STATUS_IDS: [u8; 2] = [0x00, 0x04];

/// Status values that identify an RK860-1
pub const RK860_1_STATUS_IDS: [u8; 2] = [0x44, 0x40];

/// Status written when RK860-0 is calibrated alone
pub const RK860_0_ONLY_STATUS: u8 = 0x04;

/// Status written when RK860-1 is calibrated alone
pub const RK860_1_ONLY_STATUS: u8 = 0x44;

/// Status written for RK860-0 in dual-chip calibration
pub const RK860_DUAL_STATUS_0: u8 = 0x84;

/// Status written for RK860-1 in dual-chip calibration
pub const RK860_DUAL_STATUS_1: u8 = 0x44;

/// Status written to the commit address in dual-chip calibration
pub const RK860_DUAL_COMMIT: u8 = 0x04;
