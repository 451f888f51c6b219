// src/lib.rs

//! Host-side driver for the Sensirion SPS30 particulate matter sensor on I2C.

pub mod common;
pub mod driver;
pub mod present;
pub mod transport;

#[cfg(feature = "service")]
pub mod service;

#[cfg(test)]
mod mock;

// Re-export key types for convenience
pub use common::{DeviceAddress, MeasurementReading, SensorData, Sps30Error, StatusBits};
pub use driver::{DriverState, Sps30};
pub use transport::BusTransport;

#[cfg(feature = "linux")]
pub use transport::linux::{LinuxError, LinuxTransport};
