//! RK860 trim calibration
//!
//! Silergy-family boards may carry one or two RK860 regulators at
//! [`RK860_0_ADDRESS`] and [`RK860_1_ADDRESS`]. Each one holds three trim
//! bytes that must be written back once, behind an unlock key, before the
//! chip considers itself calibrated. The run happens once at probe:
//!
//! 1. Read the status register of both addresses. A NACK means nothing is
//!    fitted; a status that is not one of the two RK860 ids means another
//!    part (SYR82x/SYR83x) answers there.
//! 2. Classify the population from the two detections.
//! 3. For uncalibrated chips, snapshot the trim bytes, unlock, write the
//!    status byte and write the snapshot back.
//!
//! Single chip: unlock the target, write its status byte to
//! [`RK860_0_ADDRESS`], rewrite the target's trim.
//!
//! Both chips: unlock RK860-0 and write [`RK860_DUAL_STATUS_0`], unlock
//! RK860-1 and write [`RK860_DUAL_STATUS_1`] (both status writes go to
//! [`RK860_0_ADDRESS`]), rewrite RK860-1 trim, write
//! [`RK860_DUAL_COMMIT`] to [`RK860_COMMIT_ADDRESS`], rewrite RK860-0 trim.
//!
//! The ordering is part of the hardware protocol. Bus errors past the
//! snapshot are logged and the sequence carries on; nothing here is ever
//! reported as a probe failure.

use embedded_hal::i2c::{Error as _, I2c};

use crate::registers::*;

/// What answered at one RK860 address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detection {
    /// No acknowledge, or any other bus failure
    Absent,
    /// Something answered with a status that is not an RK860 id
    Foreign(u8),
    /// An RK860 answered
    Present { calibrated: bool },
}

impl Detection {
    fn from_status(status: u8, ids: [u8; 2]) -> Self {
        if ids.contains(&status) {
            Detection::Present {
                calibrated: status & RK860_STATUS_CALIBRATED != 0,
            }
        } else {
            Detection::Foreign(status)
        }
    }

    /// Whether an RK860 answered
    pub fn is_present(&self) -> bool {
        matches!(self, Detection::Present { .. })
    }

    /// Whether an RK860 answered and reports calibration done
    pub fn is_calibrated(&self) -> bool {
        matches!(self, Detection::Present { calibrated: true })
    }
}

/// RK860 chips fitted on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rk860Population {
    /// No RK860 at either address
    None,
    /// Only RK860-0 at 0x40
    Rk860_0Only,
    /// Only RK860-1 at 0x41
    Rk860_1Only,
    /// RK860-0 and RK860-1
    Both,
}

impl Rk860Population {
    /// Combine the two independent detections
    pub fn classify(target0: Detection, target1: Detection) -> Self {
        match (target0.is_present(), target1.is_present()) {
            (false, false) => Rk860Population::None,
            (true, false) => Rk860Population::Rk860_0Only,
            (false, true) => Rk860Population::Rk860_1Only,
            (true, true) => Rk860Population::Both,
        }
    }
}

/// How a calibration run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationOutcome {
    /// No RK860 found
    NoTargets,
    /// The write sequence was issued
    Calibrated,
    /// Every fitted RK860 already reports calibration done
    AlreadyCalibrated,
    /// RK860-1 alone behind a foreign part at the RK860-0 address
    Unsupported,
    /// A trim snapshot could not be read; nothing was written
    Aborted,
}

/// Result of the one calibration run of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationReport {
    /// What answered at the RK860-0 address
    pub target0: Detection,
    /// What answered at the RK860-1 address
    pub target1: Detection,
    /// Population derived from the two detections
    pub population: Rk860Population,
    /// How the run ended
    pub outcome: CalibrationOutcome,
    /// Bus errors absorbed after detection
    pub bus_faults: u8,
}

/// Detect fitted RK860 chips and calibrate the ones that need it.
pub fn calibrate<I: I2c>(i2c: &mut I) -> CalibrationReport {
    let mut session = Session { i2c, bus_faults: 0 };

    let target0 = session.detect(RK860_0_ADDRESS, RK860_0_STATUS_IDS);
    let target1 = session.detect(RK860_1_ADDRESS, RK860_1_STATUS_IDS);
    let population = Rk860Population::classify(target0, target1);

    let outcome = if matches!(target0, Detection::Foreign(_))
        && population == Rk860Population::Rk860_1Only
        && !target1.is_calibrated()
    {
        warn!("rk860: rk860-1 behind a foreign part at {:#x} is not supported", RK860_0_ADDRESS);
        CalibrationOutcome::Unsupported
    } else {
        info!("rk860: population {:?}", population);
        session.run(population, target0, target1)
    };

    info!("rk860: calibration {:?}", outcome);
    CalibrationReport {
        target0,
        target1,
        population,
        outcome,
        bus_faults: session.bus_faults,
    }
}

struct Session<'a, I> {
    i2c: &'a mut I,
    bus_faults: u8,
}

impl<I: I2c> Session<'_, I> {
    fn read(&mut self, addr: u8, reg: u8) -> Result<u8, I::Error> {
        let mut buf = [0u8];
        self.i2c.write_read(addr, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write(&mut self, addr: u8, reg: u8, value: u8) {
        if let Err(e) = self.i2c.write(addr, &[reg, value]) {
            warn!(
                "rk860: write {:#x} to {:#x}/{:#x} failed: {:?}",
                value,
                addr,
                reg,
                e.kind()
            );
            self.bus_faults = self.bus_faults.saturating_add(1);
        }
    }

    fn detect(&mut self, addr: u8, ids: [u8; 2]) -> Detection {
        match self.read(addr, RK860_STATUS) {
            Err(_) => {
                debug!("rk860: nothing at {:#x}", addr);
                Detection::Absent
            }
            Ok(status) => {
                let detection = Detection::from_status(status, ids);
                match detection {
                    Detection::Foreign(_) => warn!(
                        "rk860: {:#x} is not an rk860 (status {:#x}), maybe syr82x/syr83x",
                        addr,
                        status
                    ),
                    _ => debug!("rk860: found at {:#x}, status {:#x}", addr, status),
                }
                detection
            }
        }
    }

    fn snapshot(&mut self, addr: u8) -> Option<[u8; 3]> {
        let mut trim = [0u8; 3];
        for (byte, reg) in trim.iter_mut().zip(RK860_TRIM) {
            match self.read(addr, reg) {
                Ok(value) => *byte = value,
                Err(_) => {
                    warn!("rk860: trim {:#x}/{:#x} unreadable", addr, reg);
                    return None;
                }
            }
        }
        Some(trim)
    }

    fn unlock(&mut self, addr: u8) {
        self.write(addr, RK860_UNLOCK, RK860_UNLOCK_KEY);
    }

    fn restore(&mut self, addr: u8, trim: [u8; 3]) {
        for (reg, value) in RK860_TRIM.into_iter().zip(trim) {
            self.write(addr, reg, value);
        }
    }

    /// Log the unlock, trim and status registers of `addr`.
    fn dump(&mut self, addr: u8) {
        let mut regs = [0u8; 5];
        for (value, reg) in regs.iter_mut().zip(RK860_UNLOCK..=RK860_STATUS) {
            *value = self.read(addr, reg).unwrap_or(0);
        }
        debug!(
            "rk860: {:#x} 0x0A={:#x} 0x0B={:#x} 0x0C={:#x} 0x0D={:#x} 0x0E={:#x}",
            addr,
            regs[0],
            regs[1],
            regs[2],
            regs[3],
            regs[4]
        );
    }

    fn run(
        &mut self,
        population: Rk860Population,
        target0: Detection,
        target1: Detection,
    ) -> CalibrationOutcome {
        match population {
            Rk860Population::None => CalibrationOutcome::NoTargets,
            Rk860Population::Rk860_0Only if target0.is_calibrated() => {
                CalibrationOutcome::AlreadyCalibrated
            }
            Rk860Population::Rk860_0Only => self.single(RK860_0_ADDRESS, RK860_0_ONLY_STATUS),
            Rk860Population::Rk860_1Only if target1.is_calibrated() => {
                CalibrationOutcome::AlreadyCalibrated
            }
            Rk860Population::Rk860_1Only => self.single(RK860_1_ADDRESS, RK860_1_ONLY_STATUS),
            Rk860Population::Both if target0.is_calibrated() && target1.is_calibrated() => {
                CalibrationOutcome::AlreadyCalibrated
            }
            Rk860Population::Both => self.dual(),
        }
    }

    fn single(&mut self, addr: u8, status: u8) -> CalibrationOutcome {
        let Some(trim) = self.snapshot(addr) else {
            return CalibrationOutcome::Aborted;
        };

        self.unlock(addr);
        self.write(RK860_0_ADDRESS, RK860_STATUS, status);
        self.restore(addr, trim);

        self.dump(addr);
        CalibrationOutcome::Calibrated
    }

    fn dual(&mut self) -> CalibrationOutcome {
        let (Some(trim0), Some(trim1)) = (
            self.snapshot(RK860_0_ADDRESS),
            self.snapshot(RK860_1_ADDRESS),
        ) else {
            return CalibrationOutcome::Aborted;
        };

        self.unlock(RK860_0_ADDRESS);
        self.write(RK860_0_ADDRESS, RK860_STATUS, RK860_DUAL_STATUS_0);
        self.unlock(RK860_1_ADDRESS);
        self.write(RK860_0_ADDRESS, RK860_STATUS, RK860_DUAL_STATUS_1);
        self.restore(RK860_1_ADDRESS, trim1);
        self.write(RK860_COMMIT_ADDRESS, RK860_STATUS, RK860_DUAL_COMMIT);
        self.restore(RK860_0_ADDRESS, trim0);

        CalibrationOutcome::Calibrated
    }
}
