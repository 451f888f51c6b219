// src/common/response/parse.rs

use super::data::{
    MassDensity, ParticleCount, SensorData, MASS_DENSITY_UNIT, PARTICLE_COUNT_UNIT,
    PARTICLE_SIZE_UNIT,
};
use super::error::DecodeError;

use crate::common::command::Command;
use crate::common::crc::WORD_LEN;
use crate::common::frame::ResponseFrame;
use crate::common::types::{FirmwareVersion, StatusBits};

// --- Internal Helpers ---

/// Text fields are NUL padded ASCII.
fn strip_padding(payload: &[u8]) -> &[u8] {
    match payload.iter().position(|&b| b == 0) {
        Some(end) => &payload[..end],
        None => payload,
    }
}

// --- Public Decoding Functions ---

/// Decodes a product type or serial number response into a trimmed string.
///
/// Accepts any whole number of words; the caller reads the fixed size the
/// command defines.
pub fn decode_identity(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.is_empty() || bytes.len() % WORD_LEN != 0 {
        let expected = (bytes.len() / WORD_LEN + 1) * WORD_LEN;
        return Err(DecodeError::Length { expected, got: bytes.len() });
    }
    let frame = ResponseFrame::new(bytes, bytes.len())?;
    let payload = frame.payload()?;
    let text = strip_padding(&payload);

    if !text.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return Err(DecodeError::Format);
    }
    // Checked as ASCII above, so this cannot fail.
    let text = core::str::from_utf8(text).map_err(|_| DecodeError::Format)?;
    Ok(text.trim().to_string())
}

/// Decodes Read Version: one word, major then minor.
pub fn decode_firmware_version(bytes: &[u8]) -> Result<FirmwareVersion, DecodeError> {
    let frame = ResponseFrame::new(bytes, Command::ReadFirmwareVersion.response_len())?;
    let [major, minor] = frame.word(0)?;
    Ok(FirmwareVersion { major, minor })
}

/// Decodes the 32-bit device status register.
pub fn decode_status(bytes: &[u8]) -> Result<StatusBits, DecodeError> {
    let frame = ResponseFrame::new(bytes, Command::ReadStatusRegister.response_len())?;
    frame.u32_at(0).map(StatusBits::from_bits)
}

/// Decodes the auto cleaning interval in seconds.
pub fn decode_interval(bytes: &[u8]) -> Result<u32, DecodeError> {
    let frame = ResponseFrame::new(bytes, Command::ReadAutoCleaningInterval.response_len())?;
    frame.u32_at(0)
}

/// Decodes Read Data-Ready Flag. The flag is the low byte of the word.
pub fn decode_data_ready(bytes: &[u8]) -> Result<bool, DecodeError> {
    let frame = ResponseFrame::new(bytes, Command::ReadDataReadyFlag.response_len())?;
    let [_, flag] = frame.word(0)?;
    Ok(flag == 0x01)
}

/// Decodes the 60 byte Read Measured Values response (float format).
///
/// Field order: mass concentration PM1.0, PM2.5, PM4.0, PM10, number
/// concentration PM0.5, PM1.0, PM2.5, PM4.0, PM10, typical particle size.
/// Every word is validated before any value is returned.
pub fn decode_measurement(bytes: &[u8]) -> Result<SensorData, DecodeError> {
    let frame = ResponseFrame::new(bytes, Command::ReadMeasuredValues.response_len())?;
    let payload = frame.payload()?;

    let mut values = [0f32; 10];
    for (value, chunk) in values.iter_mut().zip(payload.chunks_exact(4)) {
        *value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    Ok(SensorData {
        mass_density: MassDensity {
            pm1_0: values[0],
            pm2_5: values[1],
            pm4_0: values[2],
            pm10: values[3],
        },
        particle_count: ParticleCount {
            pm0_5: values[4],
            pm1_0: values[5],
            pm2_5: values[6],
            pm4_0: values[7],
            pm10: values[8],
        },
        particle_size: values[9],
        mass_density_unit: MASS_DENSITY_UNIT,
        particle_count_unit: PARTICLE_COUNT_UNIT,
        particle_size_unit: PARTICLE_SIZE_UNIT,
    })
}
