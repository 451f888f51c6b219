// src/transport/linux.rs

//! `/dev/i2c-N` binding through `linux-embedded-hal`.

use linux_embedded_hal::{Delay, I2CError, I2cdev};
use tracing::info;

use super::BusTransport;
use crate::common::{address::DeviceAddress, error::Sps30Error};

/// Transport over the kernel i2c-dev interface.
pub type LinuxTransport = BusTransport<I2cdev, Delay>;

/// Error type of the Linux transport.
pub type LinuxError = Sps30Error<I2CError>;

/// Character device path for bus `bus_id`.
pub fn bus_path(bus_id: u32) -> String {
    format!("/dev/i2c-{}", bus_id)
}

impl BusTransport<I2cdev, Delay> {
    /// Opens `/dev/i2c-{bus_id}` for the device at `address`.
    ///
    /// The device address is applied by the kernel per transfer, so an absent
    /// device surfaces as an I/O error on the first command rather than here.
    pub fn open(bus_id: u32, address: DeviceAddress) -> Result<Self, LinuxError> {
        let path = bus_path(bus_id);
        let dev = I2cdev::new(&path).map_err(|e| Sps30Error::Bind {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        info!(%path, %address, "opened I2C bus");
        Ok(BusTransport::new(dev, Delay, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_path() {
        assert_eq!(bus_path(1), "/dev/i2c-1");
    }

    #[test]
    fn test_missing_bus_is_bind_error() {
        let result = LinuxTransport::open(9999, DeviceAddress::SPS30);
        match result {
            Err(Sps30Error::Bind { path, .. }) => assert_eq!(path, "/dev/i2c-9999"),
            other => panic!("expected bind error, got {:?}", other.map(|_| ())),
        }
    }
}
