// src/common/response/data.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MASS_DENSITY_UNIT: &str = "µg/m³";
pub const PARTICLE_COUNT_UNIT: &str = "#/cm³";
pub const PARTICLE_SIZE_UNIT: &str = "µm";

/// Mass concentration per particle size class [µg/m³].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MassDensity {
    #[serde(rename = "pm1.0")]
    pub pm1_0: f32,
    #[serde(rename = "pm2.5")]
    pub pm2_5: f32,
    #[serde(rename = "pm4.0")]
    pub pm4_0: f32,
    #[serde(rename = "pm10")]
    pub pm10: f32,
}

impl MassDensity {
    /// `(size class key, value)` pairs in sensor order.
    pub fn entries(&self) -> [(&'static str, f32); 4] {
        [
            ("pm1.0", self.pm1_0),
            ("pm2.5", self.pm2_5),
            ("pm4.0", self.pm4_0),
            ("pm10", self.pm10),
        ]
    }
}

/// Number concentration per particle size class [#/cm³].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ParticleCount {
    #[serde(rename = "pm0.5")]
    pub pm0_5: f32,
    #[serde(rename = "pm1.0")]
    pub pm1_0: f32,
    #[serde(rename = "pm2.5")]
    pub pm2_5: f32,
    #[serde(rename = "pm4.0")]
    pub pm4_0: f32,
    #[serde(rename = "pm10")]
    pub pm10: f32,
}

impl ParticleCount {
    pub fn entries(&self) -> [(&'static str, f32); 5] {
        [
            ("pm0.5", self.pm0_5),
            ("pm1.0", self.pm1_0),
            ("pm2.5", self.pm2_5),
            ("pm4.0", self.pm4_0),
            ("pm10", self.pm10),
        ]
    }
}

/// The decoded content of one Read Measured Values response.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SensorData {
    pub mass_density: MassDensity,
    pub particle_count: ParticleCount,
    /// Typical particle size [µm].
    pub particle_size: f32,
    pub mass_density_unit: &'static str,
    pub particle_count_unit: &'static str,
    pub particle_size_unit: &'static str,
}

/// A measurement stamped with the time it was read from the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MeasurementReading {
    pub timestamp: DateTime<Utc>,
    pub sensor_data: SensorData,
}
