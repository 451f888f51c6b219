// src/common/response/error.rs

/// Error type for response validation and decoding.
///
/// Independent of the bus, so the codec can be used and tested without one.
/// Nothing here is worth retrying: the same bytes decode the same way.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// A checksum-protected word failed validation.
    #[error("checksum mismatch in word {word}: received {received:#04x}, calculated {calculated:#04x}")]
    Checksum { word: usize, received: u8, calculated: u8 },

    /// Response is not the fixed size the command returns.
    #[error("unexpected response length: expected {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },

    /// Text field contains non-ASCII or control characters.
    #[error("response is not valid text")]
    Format,
}
