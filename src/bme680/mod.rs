mod bme680_calib;
mod bme680_comp;
mod bme680_config;
mod bme680_core;
mod bme680_enums;
mod bme680_regs;

pub use self::bme680_calib::{CalibrationSet, HeaterCalibration};
pub use self::bme680_comp::{
    calc_gas_wait, calc_res_heat, compensate, compensate_gas, compensate_humidity, compensate_pressure,
    compensate_temperature, round_2, CompensatedReading, RawSample,
};
pub use self::bme680_config::DeviceConfig;
pub use self::bme680_core::{Bme680MeasuringStatus, BME680};
pub use self::bme680_enums::*;
pub use self::bme680_regs::{RegField, BME680_CALIB_DATA_LEN};
