use log::debug;

use crate::error::Result;
use crate::i2cio::RegisterBus;

use super::bme680_regs::*;

/// Factory calibration coefficients.
///
/// The `Default` value is all-zero, which is what a driver holds before
/// `initialize`. Compensating against it produces meaningless numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CalibrationSet {
    // -- calibration coefficients for temperature
    pub par_t1: u16,
    pub par_t2: i16,
    pub par_t3: i8,
    // -- calibration coefficients for pressure
    pub par_p1: u16,
    pub par_p2: i16,
    pub par_p3: i8,
    pub par_p4: i16,
    pub par_p5: i16,
    pub par_p6: i8,
    pub par_p7: i8,
    pub par_p8: i16,
    pub par_p9: i16,
    pub par_p10: u8,
    // -- calibration coefficients for humidity, h1 and h2 are 12 bit
    pub par_h1: u16,
    pub par_h2: u16,
    pub par_h3: i8,
    pub par_h4: i8,
    pub par_h5: i8,
    pub par_h6: u8,
    pub par_h7: i8,
    // -- calibration coefficients for gas
    pub par_gh1: i8,
    pub par_gh2: i16,
    pub par_gh3: i8,
    pub res_heat_range: u8,
    pub res_heat_val: i8,
    pub range_switch_error: i8,
}

fn word(data: &[u8], lsb: usize, msb: usize) -> u16 {
    (data[msb] as u16) << 8 | data[lsb] as u16
}

impl CalibrationSet {
    /// Decodes the concatenated calibration windows (`0x89..=0xa1` followed by
    /// `0xe1..=0xf0`). The heater bytes stay zero, see `with_heater_regs`.
    pub fn from_bytes(data: &[u8; BME680_CALIB_DATA_LEN]) -> CalibrationSet {
        CalibrationSet {
            par_t1: word(data, 33, 34),
            par_t2: word(data, 1, 2) as i16,
            par_t3: data[3] as i8,
            par_p1: word(data, 5, 6),
            par_p2: word(data, 7, 8) as i16,
            par_p3: data[9] as i8,
            par_p4: word(data, 11, 12) as i16,
            par_p5: word(data, 13, 14) as i16,
            par_p6: data[16] as i8,
            par_p7: data[15] as i8,
            par_p8: word(data, 19, 20) as i16,
            par_p9: word(data, 21, 22) as i16,
            par_p10: data[23],
            // -- byte 26 packs the low nibbles of h1 (bits 3:0) and h2 (bits 7:4)
            par_h1: (data[27] as u16) << 4 | (data[26] & 0x0f) as u16,
            par_h2: (data[25] as u16) << 4 | (data[26] >> 4) as u16,
            par_h3: data[28] as i8,
            par_h4: data[29] as i8,
            par_h5: data[30] as i8,
            par_h6: data[31],
            par_h7: data[32] as i8,
            par_gh1: data[37] as i8,
            par_gh2: word(data, 35, 36) as i16,
            par_gh3: data[38] as i8,
            ..Default::default()
        }
    }

    /// Fills in the heater range, heater value and range switching error from
    /// the raw contents of registers `0x02`, `0x00` and `0x04`.
    pub fn with_heater_regs(mut self, res_heat_range_reg: u8, res_heat_val_reg: u8,
        range_switch_error_reg: u8) -> CalibrationSet {
        self.res_heat_range = decode_res_heat_range(res_heat_range_reg);
        self.res_heat_val = res_heat_val_reg as i8;
        self.range_switch_error = decode_range_switch_error(range_switch_error_reg);
        self
    }

    /// Reads both calibration windows and the heater bytes. Nothing is returned
    /// unless every read succeeds.
    pub fn load<B: RegisterBus>(bus: &mut B, dev_addr: u16) -> Result<CalibrationSet> {
        let mut data = [0u8; BME680_CALIB_DATA_LEN];
        let (window_1, window_2) = data.split_at_mut(BME680_CALIB_DATA_1_LEN);
        bus.read_block(dev_addr, BME680_REG_CALIB_DATA_1, window_1)?;
        bus.read_block(dev_addr, BME680_REG_CALIB_DATA_2, window_2)?;
        debug!("Got raw calibration data: {data:02x?}");
        let res_heat_range_reg = bus.read_byte(dev_addr, BME680_REG_RES_HEAT_RANGE)?;
        let res_heat_val_reg = bus.read_byte(dev_addr, BME680_REG_RES_HEAT_VAL)?;
        let range_switch_error_reg = bus.read_byte(dev_addr, BME680_REG_RANGE_SWITCHING_ERROR)?;
        Ok(Self::from_bytes(&data).with_heater_regs(res_heat_range_reg, res_heat_val_reg, range_switch_error_reg))
    }
}

/// Heater element coefficients, read register by register whenever a heater
/// resistance target is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeaterCalibration {
    pub par_gh1: i8,
    pub par_gh2: i16,
    pub par_gh3: i8,
    pub res_heat_range: u8,
    pub res_heat_val: i8,
}

impl HeaterCalibration {
    pub fn read<B: RegisterBus>(bus: &mut B, dev_addr: u16) -> Result<HeaterCalibration> {
        let par_gh1 = bus.read_byte(dev_addr, BME680_REG_CALIB_PAR_GH1)? as i8;
        let gh2_lsb = bus.read_byte(dev_addr, BME680_REG_CALIB_PAR_GH2_LSB)?;
        let gh2_msb = bus.read_byte(dev_addr, BME680_REG_CALIB_PAR_GH2_MSB)?;
        let par_gh2 = ((gh2_msb as u16) << 8 | gh2_lsb as u16) as i16;
        let par_gh3 = bus.read_byte(dev_addr, BME680_REG_CALIB_PAR_GH3)? as i8;
        let res_heat_range = decode_res_heat_range(bus.read_byte(dev_addr, BME680_REG_RES_HEAT_RANGE)?);
        let res_heat_val = bus.read_byte(dev_addr, BME680_REG_RES_HEAT_VAL)? as i8;
        Ok(HeaterCalibration {
            par_gh1, par_gh2, par_gh3, res_heat_range, res_heat_val,
        })
    }
}

pub(crate) fn decode_res_heat_range(reg_val: u8) -> u8 {
    (reg_val & BME680_RES_HEAT_RANGE_MASK) >> 4
}

// -- signed upper nibble
pub(crate) fn decode_range_switch_error(reg_val: u8) -> i8 {
    ((reg_val & BME680_RANGE_SWITCHING_ERROR_MASK) as i8) / 16
}
