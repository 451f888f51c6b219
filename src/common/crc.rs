// src/common/crc.rs

use super::response::DecodeError;
use crc::{Algorithm, Crc};

/// Sensirion CRC-8 as used on every SPS30 data word (CRC-8/NRSC-5 parameters).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789")
pub const SENSIRION_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SENSIRION_CRC);

/// Payload bytes per checksum-protected word.
pub const WORD_PAYLOAD_LEN: usize = 2;
/// Payload bytes plus the trailing CRC byte.
pub const WORD_LEN: usize = WORD_PAYLOAD_LEN + 1;

/// Calculates the checksum byte for one word's payload.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Builds a protected word: the two payload bytes followed by their CRC.
#[inline]
pub fn encode_word(payload: [u8; WORD_PAYLOAD_LEN]) -> [u8; WORD_LEN] {
    [payload[0], payload[1], calculate_crc8(&payload)]
}

/// Verifies one received word (`[msb, lsb, crc]`) and returns its payload.
///
/// `index` is the word's position in the response, reported back on mismatch.
pub fn verify_word(word: &[u8], index: usize) -> Result<[u8; WORD_PAYLOAD_LEN], DecodeError> {
    if word.len() != WORD_LEN {
        return Err(DecodeError::Length { expected: WORD_LEN, got: word.len() });
    }
    let calculated = calculate_crc8(&word[..WORD_PAYLOAD_LEN]);
    let received = word[WORD_PAYLOAD_LEN];
    if calculated == received {
        Ok([word[0], word[1]])
    } else {
        Err(DecodeError::Checksum { word: index, received, calculated })
    }
}
