//! In-memory I2C bus for unit tests
//!
//! Models byte-wide register maps behind several 7-bit addresses. Addresses
//! without a device NACK, and single registers can be told to fail. Every
//! register access is logged in order, including ones that failed.

use std::collections::{HashMap, HashSet};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read { addr: u8, reg: u8 },
    Write { addr: u8, reg: u8, value: u8 },
}

#[derive(Debug, Default)]
pub(crate) struct FakeBus {
    devices: HashSet<u8>,
    regs: HashMap<(u8, u8), u8>,
    failing_reads: HashSet<(u8, u8)>,
    failing_writes: HashSet<(u8, u8)>,
    pub(crate) log: Vec<Access>,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attach a device at `addr` with the given `(reg, value)` contents
    pub(crate) fn with_device(mut self, addr: u8, regs: &[(u8, u8)]) -> Self {
        self.devices.insert(addr);
        for &(reg, value) in regs {
            self.regs.insert((addr, reg), value);
        }
        self
    }

    pub(crate) fn fail_read(mut self, addr: u8, reg: u8) -> Self {
        self.failing_reads.insert((addr, reg));
        self
    }

    pub(crate) fn fail_write(mut self, addr: u8, reg: u8) -> Self {
        self.failing_writes.insert((addr, reg));
        self
    }

    pub(crate) fn get(&self, addr: u8, reg: u8) -> u8 {
        self.regs.get(&(addr, reg)).copied().unwrap_or(0)
    }

    pub(crate) fn writes(&self) -> Vec<(u8, u8, u8)> {
        self.log
            .iter()
            .filter_map(|a| match *a {
                Access::Write { addr, reg, value } => Some((addr, reg, value)),
                Access::Read { .. } => None,
            })
            .collect()
    }

    pub(crate) fn reads(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|a| match *a {
                Access::Read { addr, reg } => Some((addr, reg)),
                Access::Write { .. } => None,
            })
            .collect()
    }

    fn check(&self, addr: u8, reg: u8, failing: &HashSet<(u8, u8)>) -> Result<(), ErrorKind> {
        if !self.devices.contains(&addr) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if failing.contains(&(addr, reg)) {
            return Err(ErrorKind::Bus);
        }
        Ok(())
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match operations {
            [Operation::Write(pointer), Operation::Read(buf)] if pointer.len() == 1 => {
                for (i, byte) in buf.iter_mut().enumerate() {
                    let reg = pointer[0].wrapping_add(i as u8);
                    self.log.push(Access::Read { addr: address, reg });
                    self.check(address, reg, &self.failing_reads)?;
                    *byte = self.get(address, reg);
                }
                Ok(())
            }
            [Operation::Write(data)] if data.len() >= 2 => {
                for (i, &value) in data[1..].iter().enumerate() {
                    let reg = data[0].wrapping_add(i as u8);
                    self.log.push(Access::Write {
                        addr: address,
                        reg,
                        value,
                    });
                    self.check(address, reg, &self.failing_writes)?;
                    self.regs.insert((address, reg), value);
                }
                Ok(())
            }
            _ => panic!("unsupported transaction shape"),
        }
    }
}
