use std::error::Error;
use std::fmt::Display;
use std::{fmt, io};

#[derive(Debug)]
pub enum NavError {
    InvalidHeaderLength(usize),
    InvalidMagicNumber(String),
    InvalidResponseLength(usize, usize),
    InvalidTypeCode(usize, usize),
    InvalidResponseMode(u8),
    DeviceHealthError(u16),
    ScanFlagMismatch(u8),
    CheckBitMissing(u8),
    TimeoutError(),
    SerialError(serialport::Error),
    IoError(io::Error),
    ConfigError(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NavError::InvalidHeaderLength(len) => write!(f, "Response descriptor must be always seven bytes. Actually {} bytes.", len),
            NavError::InvalidMagicNumber(magic) => write!(f, "Descriptor must start with 0xA5 0x5A. Observed = {}.", magic),
            NavError::InvalidResponseLength(expected, actual) => write!(f, "Expected response length of {} bytes but found {} bytes.",
                                                                        expected, actual),
            NavError::InvalidTypeCode(expected, actual) => write!(f, "Expected type code {} but obtained {}.", expected, actual),
            NavError::InvalidResponseMode(mode) => write!(f, "Unexpected response mode {}.", mode),
            NavError::DeviceHealthError(code) => write!(f, "Device health error. Error code = {:#06X}. See the protocol manual for details.", code),
            NavError::ScanFlagMismatch(byte) => write!(f, "Start flag and inverted start flag agree in node byte {:#04X}.", byte),
            NavError::CheckBitMissing(byte) => write!(f, "Check bit is not set in node byte {:#04X}.", byte),
            NavError::TimeoutError() => write!(f, "Operation timed out"),
            NavError::SerialError(err) => Display::fmt(&err, f),
            NavError::IoError(err) => Display::fmt(&err, f),
            NavError::ConfigError(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl Error for NavError {}

impl From<io::Error> for NavError {
    fn from(err: io::Error) -> Self {
        NavError::IoError(err)
    }
}

impl From<serialport::Error> for NavError {
    fn from(err: serialport::Error) -> Self {
        NavError::SerialError(err)
    }
}

impl From<toml::de::Error> for NavError {
    fn from(err: toml::de::Error) -> Self {
        NavError::ConfigError(err.to_string())
    }
}
