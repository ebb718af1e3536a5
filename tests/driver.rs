mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use bme680_forced::bme680::*;
use bme680_forced::error::Bme680Error;

use common::*;

fn initialized() -> BME680<MockBus, MockDelay> {
    let mut bme680 = BME680::new(MockBus::calibrated(), MockDelay::default(), DeviceConfig::default());
    bme680.initialize().unwrap();
    bme680.bus_mut().writes.clear();
    bme680.bus_mut().reads.clear();
    bme680
}

#[test]
fn initialize_resets_and_configures_the_sensor() {
    let mut bme680 = BME680::new(MockBus::calibrated(), MockDelay::default(), DeviceConfig::default());
    bme680.initialize().unwrap();
    assert_eq!(bme680.get_chip_id(), 0x61);
    assert_eq!(bme680.calibration().par_t1, 21202);
    assert_eq!(bme680.calibration().res_heat_range, 1);
    assert_eq!(bme680.calibration().res_heat_val, 46);

    let (bus, delay) = bme680.release();
    assert_eq!(bus.writes[0], (PRIMARY_ADDR, 0xe0, 0xb6));
    assert_eq!(delay.delays, vec![100]);
    assert_eq!(bus.regs[0x72], 0x01);
    assert_eq!(bus.regs[0x75], 0x00);
    assert_eq!(bus.regs[0x71], 0x10);
    // -- 100 ms at 200 °C
    assert_eq!(bus.regs[0x64], 0x59);
    assert_eq!(bus.regs[0x5a], 83);
    // -- osrs_t 2x, osrs_p 16x, forced
    assert_eq!(bus.writes.last(), Some(&(PRIMARY_ADDR, 0x74, 0x55)));
}

#[test]
fn initialize_rejects_unknown_chip() {
    let mut bus = MockBus::calibrated();
    bus.regs[0xd0] = 0x60;
    let mut bme680 = BME680::new(bus, MockDelay::default(), DeviceConfig::default());
    let err = bme680.initialize().unwrap_err();
    assert!(matches!(err, Bme680Error::UnknownChipId { found: 0x60, expected: 0x61 }));
    assert_eq!(bme680.get_chip_id(), 0);
}

#[test]
fn failed_calibration_read_keeps_previous_calibration() {
    let mut bus = MockBus::calibrated();
    bus.fail_read_reg = Some(0xe5);
    let mut bme680 = BME680::new(bus, MockDelay::default(), DeviceConfig::default());
    let err = bme680.initialize().unwrap_err();
    assert!(matches!(err, Bme680Error::Transport(_)));
    assert_eq!(*bme680.calibration(), CalibrationSet::default());
}

#[test]
fn finished_conversion_is_compensated() {
    let mut bme680 = initialized();
    bme680.bus_mut().finish_conversion(&MEAS_RESULT);

    let temperature = bme680.temperature(TemperatureUnit::Celsius).unwrap();
    assert!(temperature.is_updated());
    assert_relative_eq!(*temperature.value(), 25.03);
    assert_eq!(bme680.pressure().unwrap().into_inner(), 100653);
    assert_relative_eq!(bme680.humidity().unwrap().into_inner(), 74.02);
    let gas_resistance = bme680.gas_resistance().unwrap().into_inner().unwrap();
    assert_relative_eq!(gas_resistance, 11551724.137931034, max_relative = 1e-12);
    assert_abs_diff_eq!(bme680.pressure_altitude().unwrap().into_inner(), 56.10, epsilon = 0.01);
    assert_abs_diff_eq!(bme680.density_altitude(100653.0).unwrap().into_inner(), 0.0);
    assert!(bme680.reading().gas_valid);
    assert!(bme680.reading().heat_stable);
}

#[test]
fn no_new_data_returns_stale_cache() {
    let mut bme680 = initialized();
    let temperature = bme680.temperature(TemperatureUnit::Celsius).unwrap();
    assert_eq!(temperature, Reading::Stale(0.0));
    // -- only the status register was touched
    assert_eq!(bme680.bus().reads, vec![(PRIMARY_ADDR, 0x1d)]);
    assert!(bme680.bus().writes.is_empty());

    bme680.bus_mut().finish_conversion(&MEAS_RESULT);
    assert!(bme680.humidity().unwrap().is_updated());
    bme680.bus_mut().regs[0x1d] = 0x00;
    assert_eq!(bme680.pressure().unwrap(), Reading::Stale(100653));
}

#[test]
fn poll_triggers_next_conversion_once() {
    let mut bme680 = initialized();
    bme680.bus_mut().finish_conversion(&MEAS_RESULT);
    assert!(bme680.poll().unwrap());
    assert_eq!(bme680.bus().writes_to(0x74), vec![0x55]);
    assert_eq!(bme680.bus().writes.len(), 1);

    bme680.bus_mut().writes.clear();
    bme680.trigger_forced().unwrap();
    assert_eq!(bme680.bus().writes, vec![(PRIMARY_ADDR, 0x74, 0x55)]);
}

#[test]
fn transport_error_leaves_cache_untouched() {
    let mut bme680 = initialized();
    bme680.bus_mut().finish_conversion(&MEAS_RESULT);
    bme680.poll().unwrap();
    let cached = *bme680.reading();
    bme680.bus_mut().writes.clear();

    let mut next_result = MEAS_RESULT;
    next_result[3] = 0x70;
    bme680.bus_mut().finish_conversion(&next_result);
    bme680.bus_mut().fail_read_reg = Some(0x04);
    let err = bme680.temperature(TemperatureUnit::Celsius).unwrap_err();
    assert!(matches!(err, Bme680Error::Transport(_)));
    assert_eq!(*bme680.reading(), cached);
    assert!(bme680.bus().writes.is_empty());
}

#[test]
fn temperature_offset_and_units() {
    let mut bme680 = initialized();
    bme680.bus_mut().finish_conversion(&MEAS_RESULT);
    bme680.poll().unwrap();
    bme680.bus_mut().regs[0x1d] = 0x00;

    assert_relative_eq!(bme680.temperature(TemperatureUnit::Fahrenheit).unwrap().into_inner(), 77.054);
    assert_abs_diff_eq!(bme680.dew_point(TemperatureUnit::Celsius).unwrap().into_inner(), 20.08, epsilon = 0.01);

    bme680.set_temperature_offset(-1.5);
    assert_relative_eq!(bme680.temperature(TemperatureUnit::Celsius).unwrap().into_inner(), 23.53);
    // -- the offset is not accumulated
    assert_relative_eq!(bme680.temperature(TemperatureUnit::Celsius).unwrap().into_inner(), 23.53);
    assert_abs_diff_eq!(bme680.dew_point(TemperatureUnit::Celsius).unwrap().into_inner(), 18.63, epsilon = 0.01);
}

#[test]
fn setters_keep_neighbouring_bits() {
    let mut bme680 = initialized();
    bme680.bus_mut().regs[0x72] = 0xc0;
    bme680.bus_mut().regs[0x75] = 0x01;
    bme680.set_humidity_osr(Bme680OverSampling::Oversampling4x).unwrap();
    bme680.set_irr_filter(Bme680IrrFilter::Coef3).unwrap();
    // -- applying the same value twice changes nothing
    bme680.set_irr_filter(Bme680IrrFilter::Coef3).unwrap();
    assert_eq!(bme680.bus().regs[0x72], 0xc3);
    assert_eq!(bme680.bus().regs[0x75], 0x09);
    assert_eq!(bme680.config().irr_filter, Bme680IrrFilter::Coef3);

    bme680.set_pressure_osr(Bme680OverSampling::Oversampling1x).unwrap();
    assert_eq!(bme680.bus().regs[0x74], 0x44);
}

#[test]
fn oversampling_setters_do_not_start_a_conversion() {
    let mut bme680 = initialized();
    // -- forced conversion still running
    assert_eq!(bme680.bus().regs[0x74] & 0x03, 0x01);
    bme680.set_temperature_osr(Bme680OverSampling::Oversampling8x).unwrap();
    assert_eq!(bme680.bus().writes_to(0x74), vec![0x94]);
    bme680.set_pressure_osr(Bme680OverSampling::Oversampling4x).unwrap();
    assert_eq!(bme680.bus().writes_to(0x74), vec![0x94, 0x8c]);

    bme680.trigger_forced().unwrap();
    assert_eq!(bme680.bus().regs[0x74], 0x8d);
}

#[test]
fn power_off_sets_sleep_mode() {
    let mut bme680 = initialized();
    bme680.power(false).unwrap();
    assert_eq!(bme680.bus().regs[0x74], 0x54);
    bme680.power(true).unwrap();
    assert_eq!(bme680.bus().regs[0x74], 0x55);
}

#[test]
fn heater_profile_is_written() {
    let mut bme680 = initialized();
    bme680.set_heater(320, 150).unwrap();
    assert_eq!(bme680.bus().regs[0x64], 0x65);
    assert_eq!(bme680.bus().regs[0x5a], 114);
    assert_eq!(bme680.bus().regs[0x71], 0x10);
}

#[test]
fn select_address_switches_device() {
    let mut bme680 = initialized();
    bme680.select_address(Bme680DeviceAddress::Secondary);
    bme680.get_meas_status().unwrap();
    assert_eq!(bme680.bus().reads, vec![(0x77, 0x1d)]);
}
