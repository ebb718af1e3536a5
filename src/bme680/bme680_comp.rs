//! Fixed-point compensation of raw ADC codes.
//!
//! The integer formulas follow the Bosch BME680 driver step by step; shift
//! amounts, operand order and truncation are part of the result. Every step
//! feeding a shift runs in wrapping 32 bit arithmetic, so intermediates that
//! overflow wrap exactly as they do on the 32 bit reference.

use log::warn;

use crate::error::{Bme680Error, Result};

use super::bme680_calib::{CalibrationSet, HeaterCalibration};
use super::bme680_regs::*;

// -- list of gas ranges and corresponding constants used for the resistance calculation
const GAS_RANGE_C1: [f64; 16] = [
    1.0, 1.0, 1.0, 1.0, 1.0, 0.99, 1.0, 0.992,
    1.0, 1.0, 0.998, 0.995, 1.0, 0.99, 1.0, 1.0
];
const GAS_RANGE_C2: [f64; 16] = [
    8000000.0, 4000000.0, 2000000.0, 1000000.0, 499500.4995, 248262.1648, 125000.0, 63004.03226,
    31281.28128, 15625.0, 7812.5, 3906.25, 1953.125, 976.5625, 488.28125, 244.140625
];

const HUMIDITY_COMP_MAX: i32 = 102400;
// -- `1 << 31` in 32 bit arithmetic
const PRESSURE_DIVIDE_THRESHOLD: i64 = i32::MIN as i64;
const HEATER_TEMP_MAX: u16 = 400;
const HEATER_DURATION_LIMIT_MS: u16 = 0xfc0;

/// Raw ADC codes of one completed forced-mode conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawSample {
    pub pressure_raw: u32,
    pub temperature_raw: u32,
    pub humidity_raw: u16,
    pub gas_raw: u16,
    pub gas_range: u8,
    pub gas_valid: bool,
    pub heat_stab: bool,
}

impl RawSample {
    /// Decodes the result registers `0x1f..=0x2b`.
    pub fn from_bytes(reg_data: &[u8; BME680_MEAS_RESULT_LEN]) -> RawSample {
        // -- pressure and temperature are 20 bit, left aligned in three bytes
        let pressure_raw = ((reg_data[0] as u32) << 16 | (reg_data[1] as u32) << 8 | reg_data[2] as u32) >> 4;
        let temperature_raw = ((reg_data[3] as u32) << 16 | (reg_data[4] as u32) << 8 | reg_data[5] as u32) >> 4;
        let humidity_raw = (reg_data[6] as u16) << 8 | reg_data[7] as u16;
        // -- gas is 10 bit, msb byte plus the top two bits of the lsb byte
        let gas_msb = reg_data[11];
        let gas_lsb = reg_data[12];
        let gas_raw = (gas_msb as u16) << 2 | (gas_lsb >> 6) as u16;
        RawSample {
            pressure_raw,
            temperature_raw,
            humidity_raw,
            gas_raw,
            gas_range: gas_lsb & BME680_GAS_RANGE_MASK,
            gas_valid: (gas_lsb & BME680_GAS_VALID_BIT) > 0,
            heat_stab: (gas_lsb & BME680_HEAT_STAB_BIT) > 0,
        }
    }
}

/// Calibrated values of one conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompensatedReading {
    // -- degree celsius, without the user offset
    pub temperature: f64,
    // -- pascal
    pub pressure: i32,
    // -- percent relative humidity
    pub humidity: f64,
    // -- ohm, None when the conversion could not be computed
    pub gas_resistance: Option<f64>,
    pub gas_valid: bool,
    pub heat_stable: bool,
    pub t_fine: i32,
}

pub fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncates toward zero and wraps into 32 bits, the conversion every shift
/// step of the fixed-point formulas applies to its operand.
fn to_i32(value: f64) -> i32 {
    value as i64 as i32
}

/// Returns the temperature in °C and the fine temperature shared with the
/// pressure and humidity compensation.
pub fn compensate_temperature(calib: &CalibrationSet, temperature_raw: u32) -> (f64, i32) {
    let var1 = ((temperature_raw as i32) >> 3) - ((calib.par_t1 as i32) << 1);
    let var2 = var1.wrapping_mul(calib.par_t2 as i32) >> 11;
    let var3 = (((var1 >> 1).wrapping_mul(var1 >> 1) >> 12).wrapping_mul((calib.par_t3 as i32) << 4)) >> 14;
    let t_fine = var2.wrapping_add(var3);
    let temperature = (t_fine.wrapping_mul(5).wrapping_add(128) >> 8) as f64 / 100.0;
    (temperature, t_fine)
}

/// Pressure in Pa.
pub fn compensate_pressure(calib: &CalibrationSet, pressure_raw: u32, t_fine: i32) -> i32 {
    let par_p1 = calib.par_p1 as i32;
    let par_p2 = calib.par_p2 as i32;
    let par_p3 = calib.par_p3 as i32;
    let par_p4 = calib.par_p4 as i32;
    let par_p5 = calib.par_p5 as i32;
    let par_p6 = calib.par_p6 as i32;
    let par_p7 = calib.par_p7 as i32;
    let par_p8 = calib.par_p8 as i32;
    let par_p9 = calib.par_p9 as i32;
    let par_p10 = calib.par_p10 as i32;

    let var1 = (t_fine >> 1) - 64000;
    let var2 = (((var1 >> 2).wrapping_mul(var1 >> 2) >> 11).wrapping_mul(par_p6)) >> 2;
    let var2 = var2.wrapping_add(var1.wrapping_mul(par_p5).wrapping_shl(1));
    let var2 = (var2 >> 2).wrapping_add(par_p4 << 16);
    let var1 = ((((var1 >> 2).wrapping_mul(var1 >> 2) >> 13).wrapping_mul(par_p3 << 5)) >> 3)
        .wrapping_add(par_p2.wrapping_mul(var1) >> 1);
    let var1 = var1 >> 18;
    let var1 = (32768 + var1).wrapping_mul(par_p1) >> 15;
    // -- not wrapped, it exceeds 32 bit above ~115 kPa
    let press_comp = 1048576 - pressure_raw as i64;
    let press_comp = (press_comp - (var2 >> 12) as i64) * 3125;
    let press_comp = scale_pressure(press_comp, var1);
    let var1 = par_p9.wrapping_mul((press_comp >> 3).wrapping_mul(press_comp >> 3) >> 13) >> 12;
    let var2 = (press_comp >> 2).wrapping_mul(par_p8) >> 13;
    // -- wraps past ~106 kPa with typical calibration
    let var3 = (press_comp >> 8)
        .wrapping_mul(press_comp >> 8)
        .wrapping_mul(press_comp >> 8)
        .wrapping_mul(par_p10) >> 17;
    press_comp.wrapping_add(var1.wrapping_add(var2).wrapping_add(var3).wrapping_add(par_p7 << 7) >> 4)
}

/// Division step of the pressure compensation. The threshold is `1 << 31`
/// taken as a 32 bit value, so every intermediate a sensor can produce is
/// divided before it is doubled. A zero divisor only occurs with all-zero
/// calibration and yields 0.
pub(crate) fn scale_pressure(press_comp: i64, var1: i32) -> i32 {
    if var1 == 0 {
        return 0
    }
    if press_comp >= PRESSURE_DIVIDE_THRESHOLD {
        ((press_comp / var1 as i64) as i32).wrapping_shl(1)
    } else {
        (press_comp as i32).wrapping_shl(1).wrapping_div(var1)
    }
}

/// Relative humidity in %, clamped to 0..=100 and rounded to two decimals.
///
/// The `/ 100` steps are fractional, only the following shift truncates.
pub fn compensate_humidity(calib: &CalibrationSet, humidity_raw: u16, t_fine: i32) -> f64 {
    let par_h1 = calib.par_h1 as i32;
    let par_h2 = calib.par_h2 as f64;
    let par_h3 = calib.par_h3 as f64;
    let par_h4 = calib.par_h4 as f64;
    let par_h5 = calib.par_h5 as f64;
    let par_h6 = calib.par_h6 as i32;
    let par_h7 = calib.par_h7 as f64;

    let temp_scaled = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    let temp = temp_scaled as f64;
    let var1 = (humidity_raw as i32 - (par_h1 << 4)) - (to_i32(temp * par_h3 / 100.0) >> 1);
    let var2 = to_i32(
        par_h2
            * ((temp * par_h4 / 100.0)
                + ((to_i32(temp * (temp * par_h5 / 100.0)) >> 6) as f64 / 100.0)
                + (1 << 14) as f64),
    ) >> 10;
    let var3 = var1.wrapping_mul(var2);
    let var4 = to_i32((par_h6 << 7) as f64 + (temp * par_h7 / 100.0)) >> 4;
    let var5 = ((var3 >> 14).wrapping_mul(var3 >> 14)) >> 10;
    let var6 = var4.wrapping_mul(var5) >> 1;
    let calc_hum = ((var3.wrapping_add(var6) >> 10).wrapping_mul(1000)) >> 12;
    let calc_hum = calc_hum.clamp(0, HUMIDITY_COMP_MAX);
    round_2(calc_hum as f64 / 1024.0)
}

/// Gas resistance in Ω.
///
/// Fails with `DivideByNearZero` when `gas_raw - 512 + var1` is not positive.
pub fn compensate_gas(gas_raw: u16, gas_range: u8, range_switch_error: i8) -> Result<f64> {
    let gas_range = (gas_range & BME680_GAS_RANGE_MASK) as usize;
    let var1 = (1340.0 + 5.0 * range_switch_error as f64) * GAS_RANGE_C1[gas_range];
    gas_resistance(gas_raw, gas_range, var1)
}

fn gas_resistance(gas_raw: u16, gas_range: usize, var1: f64) -> Result<f64> {
    let denominator = gas_raw as f64 - 512.0 + var1;
    if denominator <= 0.0 {
        return Err(Bme680Error::DivideByNearZero { denominator })
    }
    Ok(var1 * GAS_RANGE_C2[gas_range] / denominator)
}

/// Runs the full pipeline on one sample. The gas resistance is `None` if its
/// denominator guard trips.
pub fn compensate(calib: &CalibrationSet, raw: &RawSample, range_switch_error: i8) -> CompensatedReading {
    let gas_resistance = compensate_gas(raw.gas_raw, raw.gas_range, range_switch_error);
    compensate_with_gas(calib, raw, gas_resistance)
}

fn compensate_with_gas(calib: &CalibrationSet, raw: &RawSample, gas_resistance: Result<f64>) -> CompensatedReading {
    let (temperature, t_fine) = compensate_temperature(calib, raw.temperature_raw);
    let pressure = compensate_pressure(calib, raw.pressure_raw, t_fine);
    let humidity = compensate_humidity(calib, raw.humidity_raw, t_fine);
    let gas_resistance = match gas_resistance {
        Ok(gas_resistance) => Some(gas_resistance),
        Err(err) => {
            warn!("Dropping gas resistance for raw code {}: {err}", raw.gas_raw);
            None
        }
    };
    CompensatedReading {
        temperature,
        pressure,
        humidity,
        gas_resistance,
        gas_valid: raw.gas_valid,
        heat_stable: raw.heat_stab,
        t_fine,
    }
}

/// Target value for a `res_heat_x` register. `target_temp` is capped at 400 °C.
pub fn calc_res_heat(heater: &HeaterCalibration, ambient_temp: i32, target_temp: u16) -> u8 {
    let target_temp = target_temp.min(HEATER_TEMP_MAX) as i64;
    let ambient_temp = ambient_temp as i64;
    let par_gh1 = heater.par_gh1 as i64;
    let par_gh2 = heater.par_gh2 as i64;
    let par_gh3 = heater.par_gh3 as i64;

    let var1 = ((ambient_temp * par_gh3) / 1000) * 256;
    let var2 = (par_gh1 + 784) * (((((par_gh2 + 154009) * target_temp * 5) / 100) + 3276800) / 10);
    let var3 = var1 + (var2 / 2);
    let var4 = var3 / (heater.res_heat_range as i64 + 4);
    let var5 = (131 * heater.res_heat_val as i64) + 65536;
    let res_heat_x100 = ((var4 / var5) - 250) * 34;
    ((res_heat_x100 + 50) / 100).clamp(0, u8::MAX as i64) as u8
}

/// Encodes a heater-on duration for a `gas_wait_x` register: six bit value,
/// two bit multiplier (1, 4, 16, 64). Durations past the range saturate.
pub fn calc_gas_wait(duration_ms: u16) -> u8 {
    if duration_ms >= HEATER_DURATION_LIMIT_MS {
        return 0xff
    }
    let mut duration = duration_ms;
    let mut factor: u8 = 0;
    while duration > 0x3f {
        duration /= 4;
        factor += 1;
    }
    (duration as u8) | factor << 6
}
