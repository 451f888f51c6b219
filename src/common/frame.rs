// src/common/frame.rs

use arrayvec::ArrayVec;

use super::crc::{verify_word, WORD_LEN, WORD_PAYLOAD_LEN};
use super::response::DecodeError;

/// Largest response payload (measured values: 20 words).
pub const MAX_PAYLOAD_LEN: usize = 20 * WORD_PAYLOAD_LEN;
/// Largest raw response, checksums included.
pub const MAX_RESPONSE_LEN: usize = 20 * WORD_LEN;

/// Response payload with checksum bytes stripped.
pub type Payload = ArrayVec<u8, MAX_PAYLOAD_LEN>;

/// A raw response of checksum-protected words, as read from the bus.
///
/// Each word is validated independently, so one corrupted word does not
/// hide the others from callers that can use partial data.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    /// Wraps `bytes`, requiring exactly `expected_len` bytes made of whole words.
    pub fn new(bytes: &'a [u8], expected_len: usize) -> Result<Self, DecodeError> {
        if bytes.len() != expected_len || bytes.len() % WORD_LEN != 0 {
            return Err(DecodeError::Length { expected: expected_len, got: bytes.len() });
        }
        Ok(ResponseFrame { bytes })
    }

    pub fn word_count(&self) -> usize {
        self.bytes.len() / WORD_LEN
    }

    /// Validated payload of word `index`.
    pub fn word(&self, index: usize) -> Result<[u8; WORD_PAYLOAD_LEN], DecodeError> {
        let start = index * WORD_LEN;
        let word = self
            .bytes
            .get(start..start + WORD_LEN)
            .ok_or(DecodeError::Length { expected: start + WORD_LEN, got: self.bytes.len() })?;
        verify_word(word, index)
    }

    /// Per-word validation results in order.
    pub fn words(&self) -> impl Iterator<Item = Result<[u8; WORD_PAYLOAD_LEN], DecodeError>> + 'a {
        self.bytes
            .chunks_exact(WORD_LEN)
            .enumerate()
            .map(|(index, word)| verify_word(word, index))
    }

    /// Concatenated payload of every word. Fails on the first bad checksum.
    pub fn payload(&self) -> Result<Payload, DecodeError> {
        let mut payload = Payload::new();
        for word in self.words() {
            payload
                .try_extend_from_slice(&word?)
                .map_err(|_| DecodeError::Length { expected: MAX_PAYLOAD_LEN, got: self.bytes.len() })?;
        }
        Ok(payload)
    }

    /// Big-endian u32 from words `index` and `index + 1`.
    pub fn u32_at(&self, index: usize) -> Result<u32, DecodeError> {
        let hi = self.word(index)?;
        let lo = self.word(index + 1)?;
        Ok(u32::from_be_bytes([hi[0], hi[1], lo[0], lo[1]]))
    }

    /// Big-endian IEEE754 float from words `index` and `index + 1`.
    pub fn f32_at(&self, index: usize) -> Result<f32, DecodeError> {
        self.u32_at(index).map(f32::from_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0x00200010 as two words
    const STATUS: [u8; 6] = [0x00, 0x20, 0x07, 0x00, 0x10, 0xC2];

    #[test]
    fn test_length_must_match() {
        assert_eq!(
            ResponseFrame::new(&STATUS[..5], 6),
            Err(DecodeError::Length { expected: 6, got: 5 })
        );
        assert_eq!(
            ResponseFrame::new(&STATUS, 3),
            Err(DecodeError::Length { expected: 3, got: 6 })
        );
    }

    #[test]
    fn test_payload_strips_checksums() {
        let frame = ResponseFrame::new(&STATUS, 6).unwrap();
        assert_eq!(frame.word_count(), 2);
        assert_eq!(frame.payload().unwrap().as_slice(), &[0x00, 0x20, 0x00, 0x10]);
        assert_eq!(frame.u32_at(0), Ok(0x0020_0010));
    }

    #[test]
    fn test_corrupted_word_is_isolated() {
        let mut bytes = STATUS;
        bytes[2] ^= 0x01;
        let frame = ResponseFrame::new(&bytes, 6).unwrap();

        assert!(matches!(frame.word(0), Err(DecodeError::Checksum { word: 0, .. })));
        assert_eq!(frame.word(1), Ok([0x00, 0x10]));
        assert!(matches!(frame.payload(), Err(DecodeError::Checksum { word: 0, .. })));
        assert!(frame.u32_at(0).is_err());
    }

    #[test]
    fn test_f32_at() {
        // 1.5f32 = 0x3FC00000
        let bytes = [0x3F, 0xC0, 0xED, 0x00, 0x00, 0x81];
        let frame = ResponseFrame::new(&bytes, 6).unwrap();
        assert_eq!(frame.f32_at(0), Ok(1.5));
    }
}
