#![allow(dead_code)]

use std::io;

use bme680_forced::i2cio::{Delay, RegisterBus};

pub const PRIMARY_ADDR: u16 = 0x76;

// -- 0x89..=0xa1 followed by 0xe1..=0xf0
pub const CALIB_WINDOW_1: [u8; 25] = [
    0x00, 0xa5, 0x66, 0x03, 0x00, 0x41, 0x8d, 0x84, 0xd7, 0x58, 0x00, 0xa9, 0x1b, 0xbc, 0xff, 0x1f,
    0x1e, 0x00, 0x00, 0x30, 0xf0, 0xb4, 0xf4, 0x1e, 0x00,
];
pub const CALIB_WINDOW_2: [u8; 16] = [
    0x3f, 0x91, 0x31, 0x00, 0x2d, 0x14, 0x78, 0x9c, 0xd2, 0x52, 0x39, 0xd4, 0xe2, 0x12, 0x00, 0x00,
];

// -- pressure 350000, temperature 419131, humidity 26000, gas 100 on range 0
pub const MEAS_RESULT: [u8; 13] = [
    0x55, 0x73, 0x00, 0x66, 0x53, 0xb0, 0x65, 0x90, 0x00, 0x00, 0x00, 0x19, 0x30,
];

/// Register file standing in for a BME680 on the bus.
pub struct MockBus {
    pub regs: [u8; 256],
    pub reads: Vec<(u16, u8)>,
    pub writes: Vec<(u16, u8, u8)>,
    // -- reads of this register fail with a transport error
    pub fail_read_reg: Option<u8>,
}

impl MockBus {
    pub fn new() -> MockBus {
        MockBus { regs: [0u8; 256], reads: Vec::new(), writes: Vec::new(), fail_read_reg: None }
    }

    /// A factory calibrated sensor with no conversion finished yet.
    pub fn calibrated() -> MockBus {
        let mut bus = MockBus::new();
        bus.regs[0x89..0x89 + 25].copy_from_slice(&CALIB_WINDOW_1);
        bus.regs[0xe1..0xe1 + 16].copy_from_slice(&CALIB_WINDOW_2);
        bus.regs[0x00] = 0x2e;
        bus.regs[0x02] = 0x10;
        bus.regs[0x04] = 0x00;
        bus.regs[0xd0] = 0x61;
        bus
    }

    /// Latches a finished conversion into the result registers.
    pub fn finish_conversion(&mut self, meas_result: &[u8; 13]) {
        self.regs[0x1f..0x1f + 13].copy_from_slice(meas_result);
        self.regs[0x1d] |= 0x80;
    }

    pub fn writes_to(&self, register: u8) -> Vec<u8> {
        self.writes.iter().filter(|(_, reg, _)| *reg == register).map(|(_, _, val)| *val).collect()
    }

    fn check_read(&mut self, dev_addr: u16, register: u8, len: usize) -> Result<(), io::Error> {
        self.reads.push((dev_addr, register));
        if let Some(fail_reg) = self.fail_read_reg {
            if (register as usize..register as usize + len).contains(&(fail_reg as usize)) {
                return Err(io::Error::new(io::ErrorKind::Other, "injected read failure"))
            }
        }
        Ok(())
    }
}

impl RegisterBus for MockBus {
    fn read_byte(&mut self, dev_addr: u16, register: u8) -> Result<u8, io::Error> {
        self.check_read(dev_addr, register, 1)?;
        Ok(self.regs[register as usize])
    }

    fn read_block(&mut self, dev_addr: u16, register: u8, data: &mut [u8]) -> Result<(), io::Error> {
        self.check_read(dev_addr, register, data.len())?;
        let start = register as usize;
        data.copy_from_slice(&self.regs[start..start + data.len()]);
        Ok(())
    }

    fn write_byte(&mut self, dev_addr: u16, register: u8, data: u8) -> Result<(), io::Error> {
        self.writes.push((dev_addr, register, data));
        self.regs[register as usize] = data;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDelay {
    pub delays: Vec<u32>,
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, milli_secs: u32) {
        self.delays.push(milli_secs);
    }
}
