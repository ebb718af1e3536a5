use log::{debug, info};
use std::path::Path;

use crate::conversions;
use crate::error::{Bme680Error, Result};
use crate::i2cio::{Delay, LinuxI2cBus, RegisterBus, StdDelay};

use super::bme680_calib::*;
use super::bme680_comp::*;
use super::bme680_config::DeviceConfig;
use super::bme680_enums::*;
use super::bme680_regs::*;

#[derive(Debug)]
pub struct Bme680MeasuringStatus {
    pub new_data: bool,
    pub gas_measuring: bool,
    pub measuring: bool,
    pub gas_meas_index: u8,
}

/// Forced-mode BME680 driver.
///
/// Every accessor polls the sensor once: if a conversion has finished its
/// result is compensated, cached and the next conversion is triggered;
/// otherwise the cached values are returned as `Reading::Stale`. Before
/// `initialize` the calibration is all-zero and the values are meaningless.
pub struct BME680<B: RegisterBus, D: Delay> {
    // -- i2c bus
    bus: B,
    delay: D,
    config: DeviceConfig,
    // -- chip id, zero until initialized
    chip_id: u8,
    // -- calibration params
    calib: CalibrationSet,
    temperature_offset: f64,
    // -- last compensated conversion
    reading: CompensatedReading,
}

impl BME680<LinuxI2cBus, StdDelay> {

    /// Opens a Linux i2c-dev bus and initializes the sensor on it.
    pub fn open(i2c_bus_path: &Path, config: DeviceConfig) -> Result<Self> {
        let bus = LinuxI2cBus::open(i2c_bus_path)?;
        let mut bme680 = BME680::new(bus, StdDelay, config);
        bme680.initialize()?;
        Ok(bme680)
    }
}

impl<B: RegisterBus, D: Delay> BME680<B, D> {

    pub fn new(bus: B, delay: D, config: DeviceConfig) -> Self {
        BME680 {
            bus,
            delay,
            config,
            chip_id: 0,
            calib: CalibrationSet::default(),
            temperature_offset: 0.0,
            reading: CompensatedReading::default(),
        }
    }

    /// Resets the sensor, checks the chip id, loads the calibration, writes
    /// the configuration and triggers the first conversion.
    pub fn initialize(&mut self) -> Result<()> {
        // -- do a soft reset since it's in an unknown state
        self.soft_reset()?;
        // -- check if device is available by reading chip id
        let chip_id = self.read_byte(BME680_REG_CHIP_ID)?;
        if chip_id != BME680_CHIP_ID {
            return Err(Bme680Error::UnknownChipId { found: chip_id, expected: BME680_CHIP_ID })
        }
        debug!("Got chip id: {chip_id:#x}");
        self.chip_id = chip_id;
        let calib = CalibrationSet::load(&mut self.bus, self.config.device_addr.value())?;
        debug!("Got calibration data: {calib:#?}");
        self.calib = calib;
        // -- set oversampling rates and filter
        self.set_humidity_osr(self.config.humidity_osr)?;
        self.set_temperature_osr(self.config.temperature_osr)?;
        self.set_pressure_osr(self.config.pressure_osr)?;
        self.set_irr_filter(self.config.irr_filter)?;
        self.init_gas_sensor()?;
        self.trigger_forced()?;
        info!("Initialized BME680 at {}", self.config.device_addr);
        Ok(())
    }

    pub fn get_chip_id(&self) -> u8 {
        self.chip_id
    }

    pub fn calibration(&self) -> &CalibrationSet {
        &self.calib
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Talks to the sensor at `device_addr` from the next transaction on.
    pub fn select_address(&mut self, device_addr: Bme680DeviceAddress) {
        debug!("Selecting device address {device_addr}");
        self.config.device_addr = device_addr;
    }

    /// Added to every calibrated temperature, also the one the dew point is
    /// computed from.
    pub fn set_temperature_offset(&mut self, offset: f64) {
        self.temperature_offset = offset;
    }

    pub fn soft_reset(&mut self) -> Result<()> {
        // -- initiate soft reset
        debug!("Initiating soft reset");
        self.write_byte(BME680_REG_RESET, BME680_COMMAND_SOFT_RESET)?;
        // -- wait for the device to startup
        self.delay.delay_ms(BME680_SOFT_RESET_DELAY_MS);
        Ok(())
    }

    /// `true` triggers a forced conversion with the configured oversampling,
    /// `false` puts the sensor to sleep.
    pub fn power(&mut self, on: bool) -> Result<()> {
        if on {
            self.trigger_forced()
        } else {
            debug!("Setting power mode {}", Bme680SensorPowerMode::Sleep);
            self.update_field(FIELD_MODE, Bme680SensorPowerMode::Sleep.value())
        }
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8> {
        let dev_addr = self.config.device_addr.value();
        Ok(self.bus.read_byte(dev_addr, reg)?)
    }

    fn write_byte(&mut self, reg: u8, reg_val: u8) -> Result<()> {
        let dev_addr = self.config.device_addr.value();
        Ok(self.bus.write_byte(dev_addr, reg, reg_val)?)
    }

    /// Read-modify-write of one or more fields of the same register. Fields
    /// that are not named keep their current value.
    fn update_fields(&mut self, reg: u8, fields: &[(RegField, u8)]) -> Result<()> {
        let reg_val = self.read_byte(reg)?;
        let new_val = fields.iter().fold(reg_val, |acc, (field, value)| {
            debug_assert_eq!(field.reg, reg);
            field.apply(acc, *value)
        });
        debug!("Setting register {reg:#04x} from {reg_val:#010b} to {new_val:#010b}");
        self.write_byte(reg, new_val)
    }

    fn update_field(&mut self, field: RegField, value: u8) -> Result<()> {
        self.update_fields(field.reg, &[(field, value)])
    }

    pub fn set_humidity_osr(&mut self, humidity_osr: Bme680OverSampling) -> Result<()> {
        debug!("Setting humidity oversampling rate {humidity_osr}");
        self.update_field(FIELD_OSRS_H, humidity_osr.value())?;
        self.config.humidity_osr = humidity_osr;
        Ok(())
    }

    /// Also puts the sensor to sleep, so that writing `ctrl_meas` back never
    /// starts a conversion. The next `trigger_forced` uses the new rate.
    pub fn set_temperature_osr(&mut self, temperature_osr: Bme680OverSampling) -> Result<()> {
        debug!("Setting temperature oversampling rate {temperature_osr}");
        let sleep = Bme680SensorPowerMode::Sleep.value();
        self.update_fields(BME680_REG_CTRL_MEAS, &[(FIELD_OSRS_T, temperature_osr.value()), (FIELD_MODE, sleep)])?;
        self.config.temperature_osr = temperature_osr;
        Ok(())
    }

    /// Also puts the sensor to sleep, so that writing `ctrl_meas` back never
    /// starts a conversion. The next `trigger_forced` uses the new rate.
    pub fn set_pressure_osr(&mut self, pressure_osr: Bme680OverSampling) -> Result<()> {
        debug!("Setting pressure oversampling rate {pressure_osr}");
        let sleep = Bme680SensorPowerMode::Sleep.value();
        self.update_fields(BME680_REG_CTRL_MEAS, &[(FIELD_OSRS_P, pressure_osr.value()), (FIELD_MODE, sleep)])?;
        self.config.pressure_osr = pressure_osr;
        Ok(())
    }

    pub fn set_irr_filter(&mut self, irr_filter: Bme680IrrFilter) -> Result<()> {
        // -- set infinite impulse response (IIR) filter
        debug!("Setting IRR filter {irr_filter}");
        self.update_field(FIELD_FILTER, irr_filter.value())?;
        self.config.irr_filter = irr_filter;
        Ok(())
    }

    /// Changes the heater step and writes it to the sensor.
    pub fn set_heater(&mut self, heater_temp: u16, heater_duration_ms: u16) -> Result<()> {
        self.config.heater_temp = heater_temp;
        self.config.heater_duration_ms = heater_duration_ms;
        self.init_gas_sensor()
    }

    /// Enables gas conversions on heater profile 0 and writes its wait time
    /// and resistance target. The heater coefficients are read from the
    /// sensor each time.
    pub fn init_gas_sensor(&mut self) -> Result<()> {
        let heater = HeaterCalibration::read(&mut self.bus, self.config.device_addr.value())?;
        debug!("Got heater calibration: {heater:?}");
        let res_heat = calc_res_heat(&heater, self.config.ambient_temp, self.config.heater_temp);
        let gas_wait = calc_gas_wait(self.config.heater_duration_ms);
        debug!("Enable run gas on heater profile 0");
        self.update_fields(BME680_REG_CTRL_GAS_1, &[(FIELD_RUN_GAS, 1), (FIELD_NB_CONV, 0)])?;
        debug!("Setting gas wait 0 to {gas_wait:#010b} / {gas_wait:#04x}");
        self.write_byte(BME680_REG_GAS_WAIT_0, gas_wait)?;
        debug!("Setting heater resistance 0 to {res_heat:#010b} for {} °C", self.config.heater_temp);
        self.write_byte(BME680_REG_RES_HEAT_0, res_heat)
    }

    /// Starts one forced-mode conversion: a single write of the oversampling
    /// bits and the forced mode bits.
    pub fn trigger_forced(&mut self) -> Result<()> {
        let reg_val = FIELD_OSRS_T.encode(self.config.temperature_osr.value())
            | FIELD_OSRS_P.encode(self.config.pressure_osr.value())
            | FIELD_MODE.encode(Bme680SensorPowerMode::Forced.value());
        debug!("Setting power mode forced, ctrl_meas {reg_val:#010b}");
        self.write_byte(BME680_REG_CTRL_MEAS, reg_val)
    }

    pub fn get_meas_status(&mut self) -> Result<Bme680MeasuringStatus> {
        // -- read current value
        let reg_val = self.read_byte(BME680_REG_MEAS_STATUS_0)?;
        // -- extract status values
        let new_data = (reg_val & BME680_MEAS_STATUS_0_NEW_DATA_BIT) > 0;
        let gas_measuring = (reg_val & BME680_MEAS_STATUS_0_GAS_MEASURING_BIT) > 0;
        let measuring = (reg_val & BME680_MEAS_STATUS_0_MEASURING_BIT) > 0;
        let gas_meas_index = reg_val & BME680_MEAS_STATUS_0_GAS_MEAS_INDEX_MASK;
        Ok(Bme680MeasuringStatus {
            new_data, gas_measuring, measuring, gas_meas_index,
        })
    }

    fn get_raw_sample(&mut self) -> Result<RawSample> {
        let mut reg_data = [0u8; BME680_MEAS_RESULT_LEN];
        let dev_addr = self.config.device_addr.value();
        self.bus.read_block(dev_addr, BME680_REG_MEAS_RESULT_BASE, &mut reg_data)?;
        Ok(RawSample::from_bytes(&reg_data))
    }

    fn get_range_switch_error(&mut self) -> Result<i8> {
        let reg_val = self.read_byte(BME680_REG_RANGE_SWITCHING_ERROR)?;
        Ok(decode_range_switch_error(reg_val))
    }

    /// Reads the status once. Returns `true` if a finished conversion was
    /// compensated into the cache, `false` if the cache was left as it was.
    /// On a bus error the cache is not modified.
    pub fn poll(&mut self) -> Result<bool> {
        let status = self.get_meas_status()?;
        if !status.new_data {
            debug!("No new data, keeping cached reading: {status:?}");
            return Ok(false)
        }
        let raw = self.get_raw_sample()?;
        debug!("Got raw sample {raw:?}");
        let range_switch_error = self.get_range_switch_error()?;
        let reading = compensate(&self.calib, &raw, range_switch_error);
        debug!("Got compensated reading {reading:?}");
        self.trigger_forced()?;
        self.reading = reading;
        Ok(true)
    }

    /// Cached reading without polling.
    pub fn reading(&self) -> &CompensatedReading {
        &self.reading
    }

    fn temperature_celsius(&self) -> f64 {
        round_2(self.reading.temperature + self.temperature_offset)
    }

    pub fn temperature(&mut self, unit: TemperatureUnit) -> Result<Reading<f64>> {
        let updated = self.poll()?;
        let celsius = self.temperature_celsius();
        Ok(Reading::new(convert_temperature(celsius, unit), updated))
    }

    pub fn humidity(&mut self) -> Result<Reading<f64>> {
        let updated = self.poll()?;
        Ok(Reading::new(self.reading.humidity, updated))
    }

    /// Pressure in Pa.
    pub fn pressure(&mut self) -> Result<Reading<i32>> {
        let updated = self.poll()?;
        Ok(Reading::new(self.reading.pressure, updated))
    }

    /// Altitude in meters against the standard sea level pressure.
    pub fn pressure_altitude(&mut self) -> Result<Reading<f64>> {
        let updated = self.poll()?;
        Ok(Reading::new(conversions::pressure_altitude(self.reading.pressure as f64), updated))
    }

    /// Altitude in meters against `sea_level_pressure` in Pa.
    pub fn density_altitude(&mut self, sea_level_pressure: f64) -> Result<Reading<f64>> {
        let updated = self.poll()?;
        let altitude = conversions::altitude(self.reading.pressure as f64, sea_level_pressure);
        Ok(Reading::new(altitude, updated))
    }

    pub fn dew_point(&mut self, unit: TemperatureUnit) -> Result<Reading<f64>> {
        let updated = self.poll()?;
        let dew_point = conversions::dew_point(self.temperature_celsius(), self.reading.humidity);
        Ok(Reading::new(convert_temperature(dew_point, unit), updated))
    }

    /// Gas resistance in Ω, `None` if the last conversion could not be
    /// computed.
    pub fn gas_resistance(&mut self) -> Result<Reading<Option<f64>>> {
        let updated = self.poll()?;
        Ok(Reading::new(self.reading.gas_resistance, updated))
    }
}

fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => conversions::celsius_to_fahrenheit(celsius),
    }
}
