use chrono::Local;
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::path::Path;
use std::process::ExitCode;
use std::{thread, time};

use bme680_forced::bme680::*;
use bme680_forced::conversions::SEA_LEVEL_PRESSURE_PA;

const EXIT_CODE_SET_CTR_C_HNDLR_FAILED: u8 = 0x02;
const EXIT_CODE_BME680_INIT_FAILED: u8 = 0x71;
const EXIT_CODE_BME680_GET_TEMPERATURE_FAILED: u8 = 0x72;
const EXIT_CODE_BME680_GET_HUMIDITY_FAILED: u8 = 0x73;
const EXIT_CODE_BME680_GET_PRESSURE_FAILED: u8 = 0x74;
const EXIT_CODE_BME680_GET_ALTITUDE_FAILED: u8 = 0x75;
const EXIT_CODE_BME680_GET_DEW_POINT_FAILED: u8 = 0x76;
const EXIT_CODE_BME680_GET_GAS_RESISTANCE_FAILED: u8 = 0x77;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum DeviceAddress {
    Primary,
    Secondary,
}

#[derive(Parser)]
struct Args {
    // -- i2c bus device
    bus_path: String,
    #[clap(long, value_enum, default_value = "primary")]
    address: DeviceAddress,
    // -- seconds between two measurements
    #[clap(long, default_value_t = 5)]
    interval_secs: u64,
    // -- added to every temperature in degree celsius
    #[clap(long, default_value_t = 0.0, allow_hyphen_values = true)]
    temp_offset: f64,
    // -- reference for the altitude in Pa
    #[clap(long, default_value_t = SEA_LEVEL_PRESSURE_PA)]
    sea_level_pressure: f64,
    #[clap(long, default_value_t = 320)]
    heater_temp: u16,
    #[clap(long)]
    fahrenheit: bool,
}

fn main() -> ExitCode {

    // -- read .env file
    dotenv::dotenv().ok();
    // -- setup logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let now = Local::now();
    info!("Starting up: {now}");

    let args = Args::parse();
    let bus_path = args.bus_path;
    info!("Using i2c bus device {bus_path}");

    // -- set handler for Ctrl-C
    if let Err(err) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, terminating...");
        std::process::exit(0);
    }) {
        error!("ERROR - Failed to set Ctrl-C handler: {err}");
        return ExitCode::from(EXIT_CODE_SET_CTR_C_HNDLR_FAILED);
    }

    info!("Initializing BME680");
    let bus_path = Path::new(&bus_path);
    let dev_addr = match args.address {
        DeviceAddress::Primary => Bme680DeviceAddress::Primary,
        DeviceAddress::Secondary => Bme680DeviceAddress::Secondary,
    };
    let config = DeviceConfig::default()
        .with_irr_filter(Bme680IrrFilter::Coef3)
        .with_heater(args.heater_temp, 150)
        .with_device_addr(dev_addr);
    let mut bme680 = match BME680::open(bus_path, config) {
        Ok(bme680) => bme680,
        Err(err) => {
            error!("ERROR - Failed to initialize BME680: {err}");
            return ExitCode::from(EXIT_CODE_BME680_INIT_FAILED);
        }
    };
    let chip_id = bme680.get_chip_id();
    info!("Got chip id {chip_id:#04x}");
    bme680.set_temperature_offset(args.temp_offset);

    let unit = if args.fahrenheit { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius };
    let unit_symbol = match unit {
        TemperatureUnit::Celsius => "°C",
        TemperatureUnit::Fahrenheit => "°F",
    };

    loop {

        // -- the first accessor picks up a finished conversion and triggers the next one,
        // -- the following accessors report that same conversion as stale
        let temperature = match bme680.temperature(unit) {
            Ok(temperature) => temperature,
            Err(err) => {
                error!("ERROR - BME680 failed to get temperature: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_TEMPERATURE_FAILED);
            }
        };
        let humidity = match bme680.humidity() {
            Ok(humidity) => humidity,
            Err(err) => {
                error!("ERROR - BME680 failed to get humidity: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_HUMIDITY_FAILED);
            }
        };
        let pressure = match bme680.pressure() {
            Ok(pressure) => pressure,
            Err(err) => {
                error!("ERROR - BME680 failed to get pressure: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_PRESSURE_FAILED);
            }
        };
        let altitude = match bme680.density_altitude(args.sea_level_pressure) {
            Ok(altitude) => altitude,
            Err(err) => {
                error!("ERROR - BME680 failed to get altitude: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_ALTITUDE_FAILED);
            }
        };
        let dew_point = match bme680.dew_point(unit) {
            Ok(dew_point) => dew_point,
            Err(err) => {
                error!("ERROR - BME680 failed to get dew point: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_DEW_POINT_FAILED);
            }
        };
        let gas_resistance = match bme680.gas_resistance() {
            Ok(gas_resistance) => gas_resistance,
            Err(err) => {
                error!("ERROR - BME680 failed to get gas resistance: {err}");
                return ExitCode::from(EXIT_CODE_BME680_GET_GAS_RESISTANCE_FAILED);
            }
        };

        if temperature.is_updated() {
            info!("Temperature {temperature} {unit_symbol}, humidity {} %, pressure {} Pa",
                humidity.value(), pressure.value());
            info!("Altitude {:.2} m, dew point {:.2} {unit_symbol}", altitude.value(), dew_point.value());
        } else {
            info!("No new data, cached temperature {temperature} {unit_symbol}");
        }
        let reading = bme680.reading();
        match gas_resistance.into_inner() {
            Some(gas_res) if reading.gas_valid && reading.heat_stable => info!("Gas resistance {gas_res:.0} Ohm"),
            Some(gas_res) => warn!("Gas resistance {gas_res:.0} Ohm, valid {} heater stable {}",
                reading.gas_valid, reading.heat_stable),
            None => warn!("No gas resistance for this conversion"),
        }

        // -- delay next measuring
        let measuring_delay = time::Duration::from_millis(args.interval_secs * 1000);
        thread::sleep(measuring_delay);
    }
}
