// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::{DeviceAddress, InvalidAddress};

// From command.rs
pub use command::{Command, CommandFrame};

// From crc.rs
pub use crc::{calculate_crc8, encode_word, verify_word};

// From error.rs
pub use error::{SequenceViolation, Sps30Error};

// From frame.rs
pub use frame::ResponseFrame;

// From hal_traits.rs
pub use hal_traits::{BusFault, DelayNs, I2c};

// From response/mod.rs
pub use response::{
    decode_data_ready, decode_firmware_version, decode_identity, decode_interval,
    decode_measurement, decode_status, DecodeError, MassDensity, MeasurementReading,
    ParticleCount, SensorData,
};

// From types.rs
pub use types::{FirmwareVersion, StatusBits};
