use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Bme680DeviceAddress {
    #[default]
    Primary,
    Secondary,
}

impl Bme680DeviceAddress {
    const ADDR_PRIMARY: u16 = 0x76;
    const ADDR_SECONDARY: u16 = 0x77;

    pub fn value(&self) -> u16 {
        match *self {
            Self::Primary => Self::ADDR_PRIMARY,
            Self::Secondary => Self::ADDR_SECONDARY,
        }
    }
}

impl fmt::Display for Bme680DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Primary => write!(f, "Primary/{:#04x}", self.value()),
            Self::Secondary => write!(f, "Secondary/{:#04x}", self.value()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bme680SensorPowerMode {
    Sleep,
    Forced,
}

impl Bme680SensorPowerMode {
    const POWERMODE_SLEEP: u8 = 0x00;
    const POWERMODE_FORCED: u8 = 0x01;

    pub fn value(&self) -> u8 {
        match *self {
            Self::Sleep => Self::POWERMODE_SLEEP,
            Self::Forced => Self::POWERMODE_FORCED,
        }
    }
}

impl fmt::Display for Bme680SensorPowerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Sleep => write!(f, "Sleep/{:#04x}", self.value()),
            Self::Forced => write!(f, "Forced/{:#04x}", self.value()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bme680OverSampling {
    NoOversampling,
    Oversampling1x,
    Oversampling2x,
    Oversampling4x,
    Oversampling8x,
    Oversampling16x,
}

impl Bme680OverSampling {
    const NO_OVERSAMPLING: u8 = 0x00;
    const OVERSAMPLING_1X: u8 = 0x01;
    const OVERSAMPLING_2X: u8 = 0x02;
    const OVERSAMPLING_4X: u8 = 0x03;
    const OVERSAMPLING_8X: u8 = 0x04;
    const OVERSAMPLING_16X: u8 = 0x05;

    pub fn value(&self) -> u8 {
        match *self {
            Self::NoOversampling => Self::NO_OVERSAMPLING,
            Self::Oversampling1x => Self::OVERSAMPLING_1X,
            Self::Oversampling2x => Self::OVERSAMPLING_2X,
            Self::Oversampling4x => Self::OVERSAMPLING_4X,
            Self::Oversampling8x => Self::OVERSAMPLING_8X,
            Self::Oversampling16x => Self::OVERSAMPLING_16X,
        }
    }
}

impl fmt::Display for Bme680OverSampling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::NoOversampling => write!(f, "NoOversampling/{:#04x}", self.value()),
            Self::Oversampling1x => write!(f, "Oversampling1x/{:#04x}", self.value()),
            Self::Oversampling2x => write!(f, "Oversampling2x/{:#04x}", self.value()),
            Self::Oversampling4x => write!(f, "Oversampling4x/{:#04x}", self.value()),
            Self::Oversampling8x => write!(f, "Oversampling8x/{:#04x}", self.value()),
            Self::Oversampling16x => write!(f, "Oversampling16x/{:#04x}", self.value()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bme680IrrFilter {
    FilterOff,
    Coef1,
    Coef3,
    Coef7,
    Coef15,
    Coef31,
    Coef63,
    Coef127,
}

impl Bme680IrrFilter {
    const FILTER_COEFF_OFF: u8 = 0x00;
    const FILTER_COEFF_1: u8 = 0x01;
    const FILTER_COEFF_3: u8 = 0x02;
    const FILTER_COEFF_7: u8 = 0x03;
    const FILTER_COEFF_15: u8 = 0x04;
    const FILTER_COEFF_31: u8 = 0x05;
    const FILTER_COEFF_63: u8 = 0x06;
    const FILTER_COEFF_127: u8 = 0x07;

    pub fn value(&self) -> u8 {
        match *self {
            Self::FilterOff => Self::FILTER_COEFF_OFF,
            Self::Coef1 => Self::FILTER_COEFF_1,
            Self::Coef3 => Self::FILTER_COEFF_3,
            Self::Coef7 => Self::FILTER_COEFF_7,
            Self::Coef15 => Self::FILTER_COEFF_15,
            Self::Coef31 => Self::FILTER_COEFF_31,
            Self::Coef63 => Self::FILTER_COEFF_63,
            Self::Coef127 => Self::FILTER_COEFF_127,
        }
    }
}

impl fmt::Display for Bme680IrrFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::FilterOff => write!(f, "FilterOff/{:#04x}", self.value()),
            Self::Coef1 => write!(f, "Coefficient 1/{:#04x}", self.value()),
            Self::Coef3 => write!(f, "Coefficient 3/{:#04x}", self.value()),
            Self::Coef7 => write!(f, "Coefficient 7/{:#04x}", self.value()),
            Self::Coef15 => write!(f, "Coefficient 15/{:#04x}", self.value()),
            Self::Coef31 => write!(f, "Coefficient 31/{:#04x}", self.value()),
            Self::Coef63 => write!(f, "Coefficient 63/{:#04x}", self.value()),
            Self::Coef127 => write!(f, "Coefficient 127/{:#04x}", self.value()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Value returned by an accessor, tagged with whether the poll behind it
/// found new data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading<T> {
    // -- a conversion completed and the cache was refreshed
    Updated(T),
    // -- no new data, this is the previously cached value
    Stale(T),
}

impl<T> Reading<T> {
    pub fn new(value: T, updated: bool) -> Reading<T> {
        if updated {
            Self::Updated(value)
        } else {
            Self::Stale(value)
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Updated(value) | Self::Stale(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Updated(value) | Self::Stale(value) => value,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Self::Updated(value) => Reading::Updated(f(value)),
            Self::Stale(value) => Reading::Stale(f(value)),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Updated(value) => write!(f, "{value}"),
            Self::Stale(value) => write!(f, "{value} (stale)"),
        }
    }
}
