//! CRC-32 engine for frame integrity checks
//!
//! Standard reversed CRC-32 (CRC-32/ISO-HDLC): polynomial `0xEDB88320`,
//! initial register `0xFFFFFFFF`, final one's complement. This matches the
//! checksum the sensor appends to every data frame.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Computes the CRC-32 checksum of a byte slice
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}
