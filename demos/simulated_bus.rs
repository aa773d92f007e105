//! Probe a Silergy regulator with two uncalibrated RK860s on a simulated bus
//!
//! On real hardware, pass your platform's `embedded_hal::i2c::I2c` bus to
//! `Fan53555::new` instead.

use std::collections::{HashMap, HashSet};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use fan53555::{Config, Error, Fan53555, Vendor};

/// Byte-wide registers behind a few 7-bit addresses
#[derive(Default)]
struct SimulatedBus {
    devices: HashSet<u8>,
    regs: HashMap<(u8, u8), u8>,
    writes: usize,
}

impl SimulatedBus {
    fn device(mut self, addr: u8, regs: &[(u8, u8)]) -> Self {
        self.devices.insert(addr);
        self.regs.extend(regs.iter().map(|&(reg, val)| ((addr, reg), val)));
        self
    }
}

impl ErrorType for SimulatedBus {
    type Error = ErrorKind;
}

impl I2c for SimulatedBus {
    fn transaction(&mut self, addr: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if !self.devices.contains(&addr) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        match ops {
            [Operation::Write(reg), Operation::Read(buf)] => {
                buf[0] = self.regs.get(&(addr, reg[0])).copied().unwrap_or(0);
                Ok(())
            }
            [Operation::Write([reg, val])] => {
                self.regs.insert((addr, *reg), *val);
                self.writes += 1;
                Ok(())
            }
            _ => Err(ErrorKind::Other),
        }
    }
}

fn main() -> Result<(), Error<ErrorKind>> {
    let bus = SimulatedBus::default()
        // SYR827 / RK860-0: ID1 = 0x88, ID2 = 0x01, status 0x00
        .device(
            0x40,
            &[(0x00, 0x80), (0x03, 0x88), (0x04, 0x01), (0x0B, 0x12), (0x0C, 0x34), (0x0D, 0x56)],
        )
        // RK860-1: status 0x40
        .device(0x41, &[(0x0B, 0x9A), (0x0C, 0xBC), (0x0D, 0xDE), (0x0E, 0x40)])
        .device(0x42, &[]);

    let mut regulator = Fan53555::new(bus, Vendor::Silergy, Config::default())?;
    let profile = regulator.probe()?;
    println!(
        "ramp: {} uV + n * {} uV, up to {} uV",
        profile.min_uv(),
        profile.step_uv(),
        profile.max_uv()
    );

    if let Some(report) = regulator.calibration_report() {
        println!("rk860: {:?} -> {:?}", report.population, report.outcome);
    }

    regulator.set_voltage(1_000_000)?;
    println!("output: {} uV", regulator.get_voltage()?);

    let bus = regulator.release();
    println!("{} register writes issued", bus.writes);
    Ok(())
}
