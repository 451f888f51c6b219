// src/common/error.rs

use super::response::DecodeError;

/// Which state the driver was in when an operation was rejected.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SequenceViolation {
    /// Operation requires an active measurement session.
    NotMeasuring,
    /// A measurement session is already running.
    AlreadyMeasuring,
    /// Operation requires the sensor to be idle.
    NotIdle,
    /// The sensor interface is asleep; only wake-up and reset are accepted.
    Sleeping,
}

impl core::fmt::Display for SequenceViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceViolation::NotMeasuring => write!(f, "measurement session not started"),
            SequenceViolation::AlreadyMeasuring => write!(f, "measurement session already running"),
            SequenceViolation::NotIdle => write!(f, "sensor is not idle"),
            SequenceViolation::Sleeping => write!(f, "sensor is in sleep mode"),
        }
    }
}

/// Every failure a driver operation can report.
///
/// `E` is the error type of the underlying I2C bus implementation.
#[derive(Debug, thiserror::Error)]
pub enum Sps30Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// The bus device could not be opened or the address is not usable.
    #[error("cannot bind {path}: {reason}")]
    Bind { path: String, reason: String },

    /// Underlying I/O error from the bus, after any retries.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The bus handle was already released.
    #[error("bus handle is closed")]
    BusClosed,

    /// A checksum-protected word failed validation.
    #[error("checksum mismatch in word {word}: received {received:#04x}, calculated {calculated:#04x}")]
    Checksum { word: usize, received: u8, calculated: u8 },

    /// Response did not have the fixed size the command expects.
    #[error("unexpected response length: expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },

    /// Decoded bytes were not valid text where text was expected.
    #[error("response is not valid text")]
    Format,

    /// A caller supplied parameter is out of range.
    #[error("invalid parameter: {0}")]
    Validation(&'static str),

    /// Operation issued in the wrong driver state.
    #[error("invalid sequence: {0}")]
    Sequence(SequenceViolation),
}

impl<E: core::fmt::Debug> From<DecodeError> for Sps30Error<E> {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Checksum { word, received, calculated } => {
                Sps30Error::Checksum { word, received, calculated }
            }
            DecodeError::Length { expected, got } => Sps30Error::Length { expected, got },
            DecodeError::Format => Sps30Error::Format,
        }
    }
}

impl<E: core::fmt::Debug> Sps30Error<E> {
    /// True for failures produced by response validation rather than the bus.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Sps30Error::Checksum { .. } | Sps30Error::Length { .. } | Sps30Error::Format
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_convert_unchanged() {
        let e: Sps30Error = DecodeError::Checksum { word: 3, received: 0x12, calculated: 0x34 }.into();
        assert!(matches!(e, Sps30Error::Checksum { word: 3, received: 0x12, calculated: 0x34 }));
        assert!(e.is_decode_error());

        let e: Sps30Error = DecodeError::Length { expected: 60, got: 57 }.into();
        assert!(matches!(e, Sps30Error::Length { expected: 60, got: 57 }));

        let e: Sps30Error = DecodeError::Format.into();
        assert!(matches!(e, Sps30Error::Format));
    }

    #[test]
    fn display_messages() {
        let e: Sps30Error = Sps30Error::Sequence(SequenceViolation::NotMeasuring);
        assert_eq!(e.to_string(), "invalid sequence: measurement session not started");

        let e: Sps30Error = Sps30Error::Validation("days must not be negative");
        assert_eq!(e.to_string(), "invalid parameter: days must not be negative");
        assert!(!e.is_decode_error());

        let e: Sps30Error = Sps30Error::Checksum { word: 0, received: 0x00, calculated: 0x92 };
        assert_eq!(
            e.to_string(),
            "checksum mismatch in word 0: received 0x00, calculated 0x92"
        );
    }
}
