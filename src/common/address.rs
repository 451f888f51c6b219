// src/common/address.rs

use core::convert::TryFrom;
use core::fmt;

/// A 7-bit I2C device address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DeviceAddress(u8);

/// Returned when a value does not fit a 7-bit address or hits a reserved range.
#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("invalid 7-bit I2C address: {0:#04x}")]
pub struct InvalidAddress(pub u16);

impl DeviceAddress {
    /// Fixed address of the SPS30.
    pub const SPS30: DeviceAddress = DeviceAddress(0x69);

    /// Creates a new `DeviceAddress` if `address` is a usable 7-bit address.
    ///
    /// `0x00..=0x07` and `0x78..=0x7F` are reserved addresses on I2C.
    pub fn new(address: u16) -> Result<Self, InvalidAddress> {
        if Self::is_valid(address) {
            Ok(DeviceAddress(address as u8))
        } else {
            Err(InvalidAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid(address: u16) -> bool {
        matches!(address, 0x08..=0x77)
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::SPS30
    }
}

impl TryFrom<u16> for DeviceAddress {
    type Error = InvalidAddress;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddress> for u8 {
    fn from(value: DeviceAddress) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Parses `0x69`, `105` style strings. Used by the binaries' argument parsing.
impl core::str::FromStr for DeviceAddress {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => s.parse::<u16>(),
        };
        let value = parsed.map_err(|_| InvalidAddress(u16::MAX))?;
        Self::new(value)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(DeviceAddress::new(0x08).is_ok());
        assert!(DeviceAddress::new(0x69).is_ok());
        assert!(DeviceAddress::new(0x77).is_ok());
    }

    #[test]
    fn test_reserved_and_out_of_range() {
        assert_eq!(DeviceAddress::new(0x00), Err(InvalidAddress(0x00)));
        assert_eq!(DeviceAddress::new(0x07), Err(InvalidAddress(0x07)));
        assert_eq!(DeviceAddress::new(0x78), Err(InvalidAddress(0x78)));
        assert_eq!(DeviceAddress::new(0x169), Err(InvalidAddress(0x169)));
    }

    #[test]
    fn test_default_is_sps30() {
        assert_eq!(DeviceAddress::default().as_u8(), 0x69);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("0x69".parse::<DeviceAddress>(), Ok(DeviceAddress::SPS30));
        assert_eq!("105".parse::<DeviceAddress>(), Ok(DeviceAddress::SPS30));
        assert!("0xZZ".parse::<DeviceAddress>().is_err());
        assert!("0x7f".parse::<DeviceAddress>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(DeviceAddress::SPS30.to_string(), "0x69");
    }
}
