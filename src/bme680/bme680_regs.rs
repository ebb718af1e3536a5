// -- chip id
pub(crate) const BME680_CHIP_ID: u8 = 0x61;

// -- control, status and result registers
pub(crate) const BME680_REG_MEAS_STATUS_0: u8 = 0x1d;
pub(crate) const BME680_REG_MEAS_RESULT_BASE: u8 = 0x1f;
pub(crate) const BME680_REG_RES_HEAT_0: u8 = 0x5a;
pub(crate) const BME680_REG_GAS_WAIT_0: u8 = 0x64;
pub(crate) const BME680_REG_CTRL_GAS_1: u8 = 0x71;
pub(crate) const BME680_REG_CTRL_HUM: u8 = 0x72;
pub(crate) const BME680_REG_CTRL_MEAS: u8 = 0x74;
pub(crate) const BME680_REG_CONFIG: u8 = 0x75;
pub(crate) const BME680_REG_CHIP_ID: u8 = 0xd0;
pub(crate) const BME680_REG_RESET: u8 = 0xe0;

// -- registers for calibration data
pub(crate) const BME680_REG_CALIB_DATA_1: u8 = 0x89;
pub(crate) const BME680_REG_CALIB_DATA_2: u8 = 0xe1;
pub(crate) const BME680_REG_RES_HEAT_VAL: u8 = 0x00;
pub(crate) const BME680_REG_RES_HEAT_RANGE: u8 = 0x02;
pub(crate) const BME680_REG_RANGE_SWITCHING_ERROR: u8 = 0x04;
pub(crate) const BME680_REG_CALIB_PAR_GH2_LSB: u8 = 0xeb;
pub(crate) const BME680_REG_CALIB_PAR_GH2_MSB: u8 = 0xec;
pub(crate) const BME680_REG_CALIB_PAR_GH1: u8 = 0xed;
pub(crate) const BME680_REG_CALIB_PAR_GH3: u8 = 0xee;

// -- length values for block reads
pub(crate) const BME680_CALIB_DATA_1_LEN: usize = 25;
pub(crate) const BME680_CALIB_DATA_2_LEN: usize = 16;
pub const BME680_CALIB_DATA_LEN: usize = BME680_CALIB_DATA_1_LEN + BME680_CALIB_DATA_2_LEN;
// -- pressure, temperature, humidity, 3 reserved bytes, gas
pub(crate) const BME680_MEAS_RESULT_LEN: usize = 13;

// -- mask and bits for meas_status_0 register
pub(crate) const BME680_MEAS_STATUS_0_NEW_DATA_BIT: u8 = 0x80;
pub(crate) const BME680_MEAS_STATUS_0_GAS_MEASURING_BIT: u8 = 0x40;
pub(crate) const BME680_MEAS_STATUS_0_MEASURING_BIT: u8 = 0x20;
pub(crate) const BME680_MEAS_STATUS_0_GAS_MEAS_INDEX_MASK: u8 = 0x0f;

// -- bits in the gas_r_lsb register
pub(crate) const BME680_GAS_VALID_BIT: u8 = 0x20;
pub(crate) const BME680_HEAT_STAB_BIT: u8 = 0x10;
pub(crate) const BME680_GAS_RANGE_MASK: u8 = 0x0f;

// -- heater calibration bits
pub(crate) const BME680_RES_HEAT_RANGE_MASK: u8 = 0x30;
pub(crate) const BME680_RANGE_SWITCHING_ERROR_MASK: u8 = 0xf0;

// -- other values
pub(crate) const BME680_COMMAND_SOFT_RESET: u8 = 0xb6;
pub(crate) const BME680_SOFT_RESET_DELAY_MS: u32 = 100;

/// A bit field inside a multi-field control register.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegField {
    pub reg: u8,
    pub mask: u8,
    pub shift: u8,
}

impl RegField {
    pub const fn new(reg: u8, mask: u8, shift: u8) -> RegField {
        RegField { reg, mask, shift }
    }

    /// Places `value` into the field, bits outside the field are dropped.
    pub fn encode(&self, value: u8) -> u8 {
        (value << self.shift) & self.mask
    }

    pub fn decode(&self, reg_val: u8) -> u8 {
        (reg_val & self.mask) >> self.shift
    }

    /// Replaces the field in `reg_val`, the other fields are kept.
    pub fn apply(&self, reg_val: u8, value: u8) -> u8 {
        (reg_val & !self.mask) | self.encode(value)
    }
}

pub(crate) const FIELD_OSRS_H: RegField = RegField::new(BME680_REG_CTRL_HUM, 0x07, 0);
pub(crate) const FIELD_OSRS_T: RegField = RegField::new(BME680_REG_CTRL_MEAS, 0xe0, 5);
pub(crate) const FIELD_OSRS_P: RegField = RegField::new(BME680_REG_CTRL_MEAS, 0x1c, 2);
pub(crate) const FIELD_MODE: RegField = RegField::new(BME680_REG_CTRL_MEAS, 0x03, 0);
pub(crate) const FIELD_FILTER: RegField = RegField::new(BME680_REG_CONFIG, 0x1c, 2);
pub(crate) const FIELD_RUN_GAS: RegField = RegField::new(BME680_REG_CTRL_GAS_1, 0x10, 4);
pub(crate) const FIELD_NB_CONV: RegField = RegField::new(BME680_REG_CTRL_GAS_1, 0x0f, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_neighbouring_fields() {
        // -- osrs_t = 2x, osrs_p = 16x, mode = sleep
        let ctrl_meas = 0b010_101_00;
        let forced = FIELD_MODE.apply(ctrl_meas, 0b01);
        assert_eq!(forced, 0b010_101_01);
        assert_eq!(FIELD_OSRS_T.decode(forced), 0b010);
        assert_eq!(FIELD_OSRS_P.decode(forced), 0b101);
    }

    #[test]
    fn apply_clears_previous_field_value() {
        let reg_val = FIELD_OSRS_T.apply(0xff, 0b001);
        assert_eq!(reg_val, 0b001_11111);
    }

    #[test]
    fn apply_is_idempotent() {
        let once = FIELD_FILTER.apply(0x01, 0x03);
        assert_eq!(FIELD_FILTER.apply(once, 0x03), once);
        assert_eq!(once, 0x0d);
    }

    #[test]
    fn encode_drops_bits_outside_field() {
        assert_eq!(FIELD_RUN_GAS.encode(0x03), 0x10);
        assert_eq!(FIELD_NB_CONV.encode(0x1f), 0x0f);
    }
}
