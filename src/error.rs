use std::fmt;

#[derive(Debug)]
pub enum Bme680Error {
    // -- bus read or write failed, the current call is aborted
    Transport(std::io::Error),
    // -- the chip id register does not identify a BME680
    UnknownChipId { found: u8, expected: u8 },
    // -- gas resistance denominator is zero or negative
    DivideByNearZero { denominator: f64 },
}

pub type Result<T> = std::result::Result<T, Bme680Error>;

impl fmt::Display for Bme680Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "I2C transport error: {err}"),
            Self::UnknownChipId { found, expected } =>
                write!(f, "Found unknown chip id '{found:#04x}', expected '{expected:#04x}'"),
            Self::DivideByNearZero { denominator } =>
                write!(f, "Gas resistance denominator {denominator} is not positive"),
        }
    }
}

impl std::error::Error for Bme680Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Bme680Error {
    fn from(error: std::io::Error) -> Self {
        Self::Transport(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_transport_errors() {
        let err: Bme680Error = std::io::Error::new(std::io::ErrorKind::TimedOut, "nack").into();
        assert!(matches!(err, Bme680Error::Transport(_)));
        assert_eq!(err.to_string(), "I2C transport error: nack");
    }

    #[test]
    fn chip_id_message_shows_both_ids() {
        let err = Bme680Error::UnknownChipId { found: 0x60, expected: 0x61 };
        assert_eq!(err.to_string(), "Found unknown chip id '0x60', expected '0x61'");
    }
}
