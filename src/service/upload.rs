// src/service/upload.rs

//! JSON shaping and HTTP delivery of measurement readings.

use std::time::Duration;

use chrono::SecondsFormat;
use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::info;

use crate::common::response::MeasurementReading;

/// One flattened value of a reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadValue {
    pub sensor: &'static str,
    /// Size class key; absent for the typical particle size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<&'static str>,
    pub value: f32,
    pub unit: &'static str,
}

/// Body of `POST /api/measurements`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRequest {
    /// RFC 3339 in UTC with a `Z` suffix.
    pub timestamp: String,
    pub values: Vec<UploadValue>,
}

impl From<&MeasurementReading> for UploadRequest {
    fn from(reading: &MeasurementReading) -> Self {
        let data = &reading.sensor_data;
        let mass = data.mass_density.entries().into_iter().map(|(parameter, value)| UploadValue {
            sensor: "mass_density",
            parameter: Some(parameter),
            value,
            unit: data.mass_density_unit,
        });
        let count = data.particle_count.entries().into_iter().map(|(parameter, value)| UploadValue {
            sensor: "particle_count",
            parameter: Some(parameter),
            value,
            unit: data.particle_count_unit,
        });
        let size = UploadValue {
            sensor: "particle_size",
            parameter: None,
            value: data.particle_size,
            unit: data.particle_size_unit,
        };

        UploadRequest {
            timestamp: reading.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            values: mass.chain(count).chain(core::iter::once(size)).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// Connection, timeout or client setup failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Destination for shaped readings.
pub trait Uploader {
    fn upload(&self, request: &UploadRequest) -> Result<(), UploadError>;
}

/// Posts readings as JSON to `http://{host}/api/measurements`.
pub struct HttpUploader {
    client: reqwest::blocking::Client,
    url: String,
}

impl std::fmt::Debug for HttpUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpUploader").field("url", &self.url).finish()
    }
}

impl HttpUploader {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, UploadError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: measurements_url(host) })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Uploader for HttpUploader {
    fn upload(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        info!(status = status.as_u16(), values = request.values.len(), "upload succeeded");
        Ok(())
    }
}

pub fn measurements_url(host: &str) -> String {
    format!("http://{}/api/measurements", host)
}
