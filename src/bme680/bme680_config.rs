use super::bme680_enums::*;

/// Settings written to the sensor by `BME680::initialize`.
///
/// The defaults are humidity 1x, temperature 2x, pressure 16x, IIR filter
/// off and a 200 °C heater step of 100 ms on the primary address.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceConfig {
    pub humidity_osr: Bme680OverSampling,
    pub temperature_osr: Bme680OverSampling,
    pub pressure_osr: Bme680OverSampling,
    pub irr_filter: Bme680IrrFilter,
    // -- heater set point in degree celsius, the sensor caps it at 400
    pub heater_temp: u16,
    pub heater_duration_ms: u16,
    // -- ambient temperature assumed for the heater resistance target
    pub ambient_temp: i32,
    pub device_addr: Bme680DeviceAddress,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            humidity_osr: Bme680OverSampling::Oversampling1x,
            temperature_osr: Bme680OverSampling::Oversampling2x,
            pressure_osr: Bme680OverSampling::Oversampling16x,
            irr_filter: Bme680IrrFilter::FilterOff,
            heater_temp: 200,
            heater_duration_ms: 100,
            ambient_temp: 25,
            device_addr: Bme680DeviceAddress::Primary,
        }
    }
}

impl DeviceConfig {
    pub fn with_humidity_osr(mut self, humidity_osr: Bme680OverSampling) -> Self {
        self.humidity_osr = humidity_osr;
        self
    }

    pub fn with_temperature_osr(mut self, temperature_osr: Bme680OverSampling) -> Self {
        self.temperature_osr = temperature_osr;
        self
    }

    pub fn with_pressure_osr(mut self, pressure_osr: Bme680OverSampling) -> Self {
        self.pressure_osr = pressure_osr;
        self
    }

    pub fn with_irr_filter(mut self, irr_filter: Bme680IrrFilter) -> Self {
        self.irr_filter = irr_filter;
        self
    }

    pub fn with_heater(mut self, heater_temp: u16, heater_duration_ms: u16) -> Self {
        self.heater_temp = heater_temp;
        self.heater_duration_ms = heater_duration_ms;
        self
    }

    pub fn with_ambient_temp(mut self, ambient_temp: i32) -> Self {
        self.ambient_temp = ambient_temp;
        self
    }

    pub fn with_device_addr(mut self, device_addr: Bme680DeviceAddress) -> Self {
        self.device_addr = device_addr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let config = DeviceConfig::default()
            .with_pressure_osr(Bme680OverSampling::Oversampling4x)
            .with_irr_filter(Bme680IrrFilter::Coef3)
            .with_heater(320, 150)
            .with_device_addr(Bme680DeviceAddress::Secondary);
        assert_eq!(config.pressure_osr, Bme680OverSampling::Oversampling4x);
        assert_eq!(config.humidity_osr, Bme680OverSampling::Oversampling1x);
        assert_eq!(config.irr_filter, Bme680IrrFilter::Coef3);
        assert_eq!((config.heater_temp, config.heater_duration_ms), (320, 150));
        assert_eq!(config.device_addr.value(), 0x77);
    }
}
