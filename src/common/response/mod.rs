// src/common/response/mod.rs

mod data;
mod error;
pub mod parse; // Make decode functions public

// Re-export items for external use
pub use data::{
    MassDensity, MeasurementReading, ParticleCount, SensorData, MASS_DENSITY_UNIT,
    PARTICLE_COUNT_UNIT, PARTICLE_SIZE_UNIT,
};
pub use error::DecodeError;
pub use parse::{
    decode_data_ready, decode_firmware_version, decode_identity, decode_interval,
    decode_measurement, decode_status,
};
