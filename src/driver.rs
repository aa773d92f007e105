//! Synchronous FAN53555 regulator driver implementation

use crate::{
    calibration::{self, CalibrationReport, Rk860Population},
    error::Error,
    ramp::{self, RampProfile},
    registers::*,
    types::*,
};
use embedded_hal::i2c::I2c;

/// FAN53555 regulator driver
pub struct Fan53555<I> {
    i2c: I,
    addr: u8,
    vendor: Vendor,
    roles: SelectorRoles,
    calibrate: bool,
    chip: Option<ChipInfo>,
    calibration: Option<CalibrationReport>,
}

impl<I> Fan53555<I>
where
    I: I2c,
{
    /// This is a buck regulator
    pub const REGULATOR_KIND: RegulatorKind = RegulatorKind::Buck;

    /// Create a new driver instance
    ///
    /// No bus traffic happens until [`probe`](Self::probe). Fails with
    /// `Error::InvalidConfiguration` if the suspend voltage selector is
    /// neither VSEL0 nor VSEL1.
    ///
    /// # Example
    /// ```no_run
    /// # use fan53555::{Config, Fan53555, Vendor};
    /// # use embedded_hal::i2c::I2c;
    /// # fn example<I: I2c>(i2c: I) -> Result<(), fan53555::Error<I::Error>> {
    /// let mut regulator = Fan53555::new(i2c, Vendor::Silergy, Config::default())?;
    /// regulator.probe()?;
    /// regulator.set_voltage(1_000_000)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(i2c: I, vendor: Vendor, config: Config) -> Result<Self, Error<I::Error>> {
        let Some(roles) = config.selector_roles() else {
            error!(
                "fan53555: invalid vsel id {}",
                config.suspend_voltage_selector
            );
            return Err(Error::InvalidConfiguration);
        };

        Ok(Self {
            i2c,
            addr: config.address,
            vendor,
            roles,
            calibrate: config.calibrate,
            chip: None,
            calibration: None,
        })
    }

    /// Identify the chip and select its voltage ramp
    ///
    /// Reads ID1 and ID2, resolves the ramp profile and, for Silergy parts,
    /// runs the RK860 trim calibration once. Calibration problems are logged
    /// and kept in [`calibration_report`](Self::calibration_report); they
    /// never fail the probe. Probing again returns the profile found the
    /// first time without touching the bus.
    pub fn probe(&mut self) -> Result<&'static RampProfile, Error<I::Error>> {
        if let Some(chip) = self.chip {
            return Ok(chip.profile);
        }

        let id1 = self.read_register(FAN53555_ID1)?;
        let id2 = self.read_register(FAN53555_ID2)?;
        let die_id = id1 & FAN53555_DIE_ID_MASK;
        let die_rev = id2 & FAN53555_DIE_REV_MASK;

        let profile = ramp::resolve(self.vendor, die_id, die_rev).map_err(|e| {
            error!(
                "fan53555: die id {} rev {} not supported!",
                e.die_id,
                e.die_rev
            );
            Error::UnsupportedVariant {
                die_id: e.die_id,
                die_rev: e.die_rev,
            }
        })?;

        self.chip = Some(ChipInfo {
            vendor: self.vendor,
            die_id,
            die_rev,
            profile,
        });
        info!(
            "fan53555: option {} rev {} detected, {} uV + n * {} uV",
            die_id,
            die_rev,
            profile.vsel_min_uv,
            profile.vsel_step_uv
        );

        if self.calibrate && self.vendor.supports_rk860_calibration() && self.calibration.is_none() {
            self.calibration = Some(calibration::calibrate(&mut self.i2c));
        }

        Ok(profile)
    }

    // ========================================
    // Low-level I2C operations
    // ========================================

    /// Read a single register
    fn read_register(&mut self, reg: u8) -> Result<u8, Error<I::Error>> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    /// Write a single register
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.i2c.write(self.addr, &[reg, value]).map_err(Error::I2c)
    }

    /// Replace the bits selected by `mask`, leaving the rest of the register as read
    fn update_bits(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), Error<I::Error>> {
        let val = self.read_register(reg)?;
        self.write_register(reg, (val & !mask) | (value & mask))
    }

    fn profile(&self) -> Result<&'static RampProfile, Error<I::Error>> {
        self.chip.map(|c| c.profile).ok_or(Error::NotProbed)
    }

    // ========================================
    // Voltage control
    // ========================================

    /// Get the normal-mode output voltage in uV
    pub fn get_voltage(&mut self) -> Result<u32, Error<I::Error>> {
        let profile = self.profile()?;
        let raw = self.read_register(self.roles.active().register())?;
        let uv = profile.to_voltage(raw);
        debug!("fan53555: get_voltage: {} uV", uv);
        Ok(uv)
    }

    /// Set the normal-mode output voltage in uV
    ///
    /// The voltage is truncated down to the nearest step. Returns
    /// `Error::InvalidVoltage` if it lies outside the chip's ramp. Only the
    /// 7-bit selector field is written; the enable bit keeps its value.
    pub fn set_voltage(&mut self, microvolt: u32) -> Result<(), Error<I::Error>> {
        let profile = self.profile()?;
        if !profile.contains(microvolt) {
            return Err(Error::InvalidVoltage);
        }
        let code = profile.to_code(microvolt);
        let reg = self.roles.active().register();
        debug!(
            "fan53555: set_voltage: {} uV, writing {:#x} to vsel {}",
            microvolt,
            code,
            reg
        );
        self.update_bits(reg, FAN53555_VSEL_WRITE_MASK, code)
    }

    // ========================================
    // Device information
    // ========================================

    /// Vendor, die id, die revision and ramp, once probed
    pub fn chip_info(&self) -> Option<ChipInfo> {
        self.chip
    }

    /// Which selector is active and which holds the suspend voltage
    pub fn selector_roles(&self) -> SelectorRoles {
        self.roles
    }

    /// RK860 chips found at probe; `Rk860Population::None` if calibration did not run
    pub fn population(&self) -> Rk860Population {
        self.calibration
            .map(|r| r.population)
            .unwrap_or(Rk860Population::None)
    }

    /// Report of the calibration run, if one happened
    pub fn calibration_report(&self) -> Option<&CalibrationReport> {
        self.calibration.as_ref()
    }

    /// Destroy the driver and return the bus
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationOutcome, Detection};
    use crate::test_bus::FakeBus;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    /// Fairchild option 00 at 0x60, out of the way of the RK860 addresses
    fn fairchild_option_00() -> FakeBus {
        FakeBus::new().with_device(
            0x60,
            &[
                (FAN53555_VSEL0, 0x80),
                (FAN53555_VSEL1, 0x80),
                (FAN53555_ID1, 0x80),
                (FAN53555_ID2, 0x03),
            ],
        )
    }

    fn config() -> Config {
        Config::new().with_address(0x60)
    }

    #[test]
    fn new_rejects_unknown_selector() {
        let result = Fan53555::new(
            FakeBus::new(),
            Vendor::Fairchild,
            Config::new().with_suspend_voltage_selector(2),
        );
        assert!(matches!(result, Err(Error::InvalidConfiguration)));
    }

    #[test]
    fn probe_resolves_ramp_from_id_nibbles() {
        let mut reg = Fan53555::new(fairchild_option_00(), Vendor::Fairchild, config()).unwrap();
        let profile = reg.probe().unwrap();

        assert_eq!(profile.vsel_min_uv, 600_000);
        assert_eq!(profile.vsel_step_uv, 10_000);
        let info = reg.chip_info().unwrap();
        assert_eq!((info.die_id, info.die_rev), (0x0, 0x3));
        assert_eq!(reg.population(), Rk860Population::None);
        assert!(reg.calibration_report().is_none());
    }

    #[test]
    fn probe_twice_reuses_profile() {
        let mut reg = Fan53555::new(fairchild_option_00(), Vendor::Fairchild, config()).unwrap();
        let first = reg.probe().unwrap();
        let second = reg.probe().unwrap();
        assert!(core::ptr::eq(first, second));

        let bus = reg.release();
        assert_eq!(bus.reads().len(), 2);
    }

    #[test]
    fn id_read_failure_aborts_probe() {
        let bus = fairchild_option_00().fail_read(0x60, FAN53555_ID2);
        let mut reg = Fan53555::new(bus, Vendor::Fairchild, config()).unwrap();

        assert_eq!(reg.probe(), Err(Error::I2c(ErrorKind::Bus)));
        assert!(reg.chip_info().is_none());
        assert_eq!(reg.get_voltage(), Err(Error::NotProbed));
    }

    #[test]
    fn missing_chip_aborts_probe() {
        let mut reg = Fan53555::new(FakeBus::new(), Vendor::Silergy, Config::default()).unwrap();
        assert_eq!(
            reg.probe(),
            Err(Error::I2c(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address
            )))
        );
        // No calibration without a probed chip.
        assert!(reg.calibration_report().is_none());
    }

    #[test]
    fn unknown_option_is_unsupported() {
        let bus = FakeBus::new().with_device(0x60, &[(FAN53555_ID1, 0x07), (FAN53555_ID2, 0x0F)]);
        let mut reg = Fan53555::new(bus, Vendor::Fairchild, config()).unwrap();

        assert_eq!(
            reg.probe(),
            Err(Error::UnsupportedVariant {
                die_id: 0x7,
                die_rev: 0xF
            })
        );
        assert_eq!(reg.set_voltage(1_000_000), Err(Error::NotProbed));
    }

    #[test]
    fn get_voltage_masks_flag_bits() {
        let bus = fairchild_option_00().with_device(0x60, &[(FAN53555_VSEL0, 0xC5)]);
        let mut reg = Fan53555::new(bus, Vendor::Fairchild, config()).unwrap();
        reg.probe().unwrap();

        assert_eq!(reg.get_voltage(), Ok(650_000));
    }

    #[test]
    fn set_voltage_updates_only_selector_field() {
        let mut reg = Fan53555::new(fairchild_option_00(), Vendor::Fairchild, config()).unwrap();
        reg.probe().unwrap();

        reg.set_voltage(1_005_000).unwrap();
        let bus = reg.release();
        // 40 steps, truncated; BUCK_EN in bit 7 kept.
        assert_eq!(bus.get(0x60, FAN53555_VSEL0), 0x80 | 40);
        assert_eq!(bus.get(0x60, FAN53555_VSEL1), 0x80);
    }

    #[test]
    fn set_voltage_clears_bit_6() {
        let bus = fairchild_option_00().with_device(0x60, &[(FAN53555_VSEL0, 0xFF)]);
        let mut reg = Fan53555::new(bus, Vendor::Fairchild, config()).unwrap();
        reg.probe().unwrap();

        reg.set_voltage(600_000).unwrap();
        assert_eq!(reg.release().get(0x60, FAN53555_VSEL0), 0x80);
    }

    #[test]
    fn vsel0_suspend_drives_vsel1() {
        let mut reg = Fan53555::new(
            fairchild_option_00(),
            Vendor::Fairchild,
            config().with_suspend_voltage_selector(0),
        )
        .unwrap();
        reg.probe().unwrap();

        reg.set_voltage(700_000).unwrap();
        assert_eq!(reg.get_voltage(), Ok(700_000));
        let bus = reg.release();
        assert_eq!(bus.get(0x60, FAN53555_VSEL1), 0x80 | 10);
        assert_eq!(bus.get(0x60, FAN53555_VSEL0), 0x80);
    }

    #[test]
    fn set_voltage_outside_ramp_is_rejected() {
        let mut reg = Fan53555::new(fairchild_option_00(), Vendor::Fairchild, config()).unwrap();
        reg.probe().unwrap();

        assert_eq!(reg.set_voltage(599_999), Err(Error::InvalidVoltage));
        assert_eq!(reg.set_voltage(1_240_000), Err(Error::InvalidVoltage));
        assert!(reg.release().writes().is_empty());
    }

    #[test]
    fn fairchild_never_calibrates() {
        let bus = fairchild_option_00().with_device(0x41, &[(0x0E, 0x40)]);
        let mut reg = Fan53555::new(bus, Vendor::Fairchild, config()).unwrap();
        reg.probe().unwrap();

        assert!(reg.calibration_report().is_none());
        let bus = reg.release();
        assert!(bus.reads().iter().all(|&(addr, _)| addr == 0x60));
    }

    /// SYR827 at 0x40 that is an uncalibrated RK860-0
    fn silergy_rk860_0() -> FakeBus {
        FakeBus::new().with_device(
            0x40,
            &[
                (FAN53555_VSEL0, 0x80),
                (FAN53555_ID1, 0x88),
                (FAN53555_ID2, 0x01),
                (0x0B, 0x11),
                (0x0C, 0x22),
                (0x0D, 0x33),
                (0x0E, 0x00),
            ],
        )
    }

    #[test]
    fn silergy_probe_calibrates_once() {
        let mut reg = Fan53555::new(silergy_rk860_0(), Vendor::Silergy, Config::default()).unwrap();
        let profile = reg.probe().unwrap();
        assert_eq!(profile.vsel_min_uv, 712_500);

        let report = *reg.calibration_report().unwrap();
        assert_eq!(report.population, Rk860Population::Rk860_0Only);
        assert_eq!(report.outcome, CalibrationOutcome::Calibrated);
        assert_eq!(reg.population(), Rk860Population::Rk860_0Only);

        reg.probe().unwrap();
        let bus = reg.release();
        assert_eq!(bus.writes().len(), 5);
        assert_eq!(bus.get(0x40, 0x0E), 0x04);
    }

    #[test]
    fn calibration_can_be_disabled() {
        let mut reg = Fan53555::new(
            silergy_rk860_0(),
            Vendor::Silergy,
            Config::default().with_calibration(false),
        )
        .unwrap();
        reg.probe().unwrap();

        assert!(reg.calibration_report().is_none());
        assert!(reg.release().writes().is_empty());
    }

    #[test]
    fn unsupported_population_does_not_fail_probe() {
        // SYR827 at 0x40 (not an RK860) next to an uncalibrated RK860-1.
        let bus = FakeBus::new()
            .with_device(0x40, &[(FAN53555_ID1, 0x88), (FAN53555_ID2, 0x00), (0x0E, 0x88)])
            .with_device(0x41, &[(0x0E, 0x40)]);
        let mut reg = Fan53555::new(bus, Vendor::Silergy, Config::default()).unwrap();

        assert!(reg.probe().is_ok());
        let report = reg.calibration_report().unwrap();
        assert_eq!(report.target0, Detection::Foreign(0x88));
        assert_eq!(report.outcome, CalibrationOutcome::Unsupported);
        assert!(reg.release().writes().is_empty());
    }

    #[test]
    fn calibration_bus_errors_do_not_fail_probe() {
        let bus = silergy_rk860_0()
            .fail_write(0x40, 0x0A)
            .fail_write(0x40, 0x0C);
        let mut reg = Fan53555::new(bus, Vendor::Silergy, Config::default()).unwrap();

        assert!(reg.probe().is_ok());
        assert_eq!(reg.calibration_report().unwrap().bus_faults, 2);
        reg.set_voltage(800_000).unwrap();
        assert_eq!(reg.get_voltage(), Ok(800_000));
    }
}
