//! Unit conversions on already compensated values.

/// Standard sea level pressure in Pa.
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101325.0;

// -- Magnus coefficients
const MAGNUS_B: f64 = 17.625;
const MAGNUS_C: f64 = 243.04;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    32.0 + celsius * 9.0 / 5.0
}

/// Barometric altitude in meters for `pressure` relative to
/// `sea_level_pressure`, both in Pa.
pub fn altitude(pressure: f64, sea_level_pressure: f64) -> f64 {
    let atmospheric = pressure / 100.0;
    let reference = sea_level_pressure / 100.0;
    44330.0 * (1.0 - (atmospheric / reference).powf(1.0 / 5.255))
}

/// Altitude against the standard atmosphere.
pub fn pressure_altitude(pressure: f64) -> f64 {
    altitude(pressure, SEA_LEVEL_PRESSURE_PA)
}

/// Dew point in °C. A humidity of 0 % has no dew point and gives NaN.
pub fn dew_point(temperature: f64, humidity: f64) -> f64 {
    let gamma = (humidity / 100.0).ln() + (MAGNUS_B * temperature) / (MAGNUS_C + temperature);
    MAGNUS_C * gamma / (MAGNUS_B - gamma)
}
