pub mod bme680;
pub mod conversions;
pub mod error;
pub mod i2cio;
