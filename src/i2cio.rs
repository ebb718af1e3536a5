use i2c_linux::I2c;
use log::debug;
use std::fs::File;
use std::path::Path;
use std::{thread, time};

/// Byte-level register access on a 7-bit addressed two-wire bus.
///
/// Every call is one blocking bus transaction. Errors are returned as they
/// come from the bus, nothing is retried.
pub trait RegisterBus {
    fn read_byte(&mut self, dev_addr: u16, register: u8) -> Result<u8, std::io::Error>;

    /// Reads `data.len()` consecutive registers starting at `register`.
    /// A short read is an error.
    fn read_block(&mut self, dev_addr: u16, register: u8, data: &mut [u8]) -> Result<(), std::io::Error>;

    fn write_byte(&mut self, dev_addr: u16, register: u8, data: u8) -> Result<(), std::io::Error>;
}

/// Blocking millisecond sleep.
pub trait Delay {
    fn delay_ms(&mut self, milli_secs: u32);
}

/// `RegisterBus` on a Linux i2c-dev character device.
pub struct LinuxI2cBus {
    i2c: I2c<File>,
    // -- slave address currently selected on the adapter
    slave_addr: Option<u16>,
}

impl LinuxI2cBus {
    pub fn open(bus_path: &Path) -> Result<LinuxI2cBus, std::io::Error> {
        let i2c = get_bus(bus_path)?;
        Ok(LinuxI2cBus { i2c, slave_addr: None })
    }

    fn select(&mut self, dev_addr: u16) -> Result<(), std::io::Error> {
        if self.slave_addr != Some(dev_addr) {
            debug!("Selecting slave address {dev_addr:#04x}");
            set_slave(&mut self.i2c, dev_addr)?;
            self.slave_addr = Some(dev_addr);
        }
        Ok(())
    }
}

impl RegisterBus for LinuxI2cBus {
    fn read_byte(&mut self, dev_addr: u16, register: u8) -> Result<u8, std::io::Error> {
        self.select(dev_addr)?;
        self.i2c.smbus_read_byte_data(register)
    }

    fn read_block(&mut self, dev_addr: u16, register: u8, data: &mut [u8]) -> Result<(), std::io::Error> {
        self.select(dev_addr)?;
        let bytes_read = self.i2c.i2c_read_block_data(register, data)?;
        if bytes_read != data.len() {
            let errmsg = format!("Short block read at {register:#04x}: got {bytes_read} of {} bytes", data.len());
            return Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, errmsg))
        }
        Ok(())
    }

    fn write_byte(&mut self, dev_addr: u16, register: u8, data: u8) -> Result<(), std::io::Error> {
        self.select(dev_addr)?;
        self.i2c.smbus_write_byte_data(register, data)
    }
}

/// `Delay` backed by `thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, milli_secs: u32) {
        delay(milli_secs)
    }
}

pub fn get_bus(bus_path: &Path) -> Result<I2c<File>, std::io::Error> {
    I2c::from_path(bus_path)
}

pub fn set_slave(i2c: &mut I2c<File>, dev_addr: u16) -> Result<(), std::io::Error> {
    i2c.smbus_set_slave_address(dev_addr, false)
}

pub fn delay(milli_secs: u32) {
    let delay = time::Duration::from_millis(milli_secs as u64);
    thread::sleep(delay);
}
