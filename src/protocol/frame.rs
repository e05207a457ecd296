//! Frame assembly and decoding
//!
//! A data frame is exactly 28 bytes: 24 payload bytes followed by a CRC-32
//! trailer stored little-endian. All multi-byte fields are little-endian.
//!
//! Frame layout:
//!
//! | Offset | Width | Field |
//! |---|---|---|
//! | 0-3   | u32 | running time (s) |
//! | 4-7   | u32 | cumulative radon |
//! | 8-9   | u16 | last 10 minutes |
//! | 10-11 | —   | reserved |
//! | 12-13 | u16 | last 1 hour |
//! | 14-15 | u16 | last 12 hours |
//! | 16-17 | u16 | last 24 hours |
//! | 18-19 | u16 | last 48 hours |
//! | 20-21 | —   | reserved |
//! | 22-23 | u16 | last 96 hours |
//! | 24-27 | u32 | CRC-32 trailer |

use crate::core::{DecodedReading, Result, CRC_PAYLOAD_LEN, FRAME_LEN};
use crate::transport::ByteSource;

/// An exact 28-byte data frame, immutable once assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    /// Wraps an exact frame-length byte array
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    /// Returns the full frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Returns the CRC-covered payload, bytes 0-23
    pub fn payload(&self) -> &[u8] {
        &self.0[..CRC_PAYLOAD_LEN]
    }

    /// Returns the CRC received in the trailer, bytes 24-27 little-endian
    pub fn received_crc(&self) -> u32 {
        u32_le(&self.0, CRC_PAYLOAD_LEN)
    }

    /// Returns the two trailer-adjacent bytes 26-27 checked by the optional
    /// footer marker
    pub fn footer(&self) -> [u8; 2] {
        [self.0[26], self.0[27]]
    }
}

/// Result of one frame assembly attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    /// Fewer bytes buffered than a full frame; nothing was consumed
    Insufficient,
    /// Availability dropped between the initial check and the read;
    /// nothing was consumed
    Aborted,
    /// A full frame was read
    Complete(RawFrame),
}

/// Attempts to read exactly one frame from the source without blocking
///
/// Availability is checked twice: the check and the destructive reads are
/// not atomic with respect to the source, and a short read here would
/// desynchronize every subsequent frame. If the second check fails the tick
/// is abandoned with the stream position untouched.
pub fn assemble_frame(source: &mut dyn ByteSource) -> Result<Assembly> {
    if source.available()? < FRAME_LEN {
        return Ok(Assembly::Insufficient);
    }
    if source.available()? < FRAME_LEN {
        return Ok(Assembly::Aborted);
    }
    let mut bytes = [0u8; FRAME_LEN];
    for slot in bytes.iter_mut() {
        *slot = source.read_one()?;
    }
    Ok(Assembly::Complete(RawFrame(bytes)))
}

/// Decodes a CRC-validated frame into its integer fields
///
/// Total over any well-formed frame; callers validate the CRC first. Reserved
/// bytes 10-11 and 20-21 are skipped.
pub fn decode_frame(frame: &RawFrame) -> DecodedReading {
    let bytes = frame.as_bytes();
    DecodedReading {
        running_time: u32_le(bytes, 0),
        cumulative_radon: u32_le(bytes, 4),
        last_10_min: u16_le(bytes, 8),
        last_1_hour: u16_le(bytes, 12),
        last_12_hour: u16_le(bytes, 14),
        last_24_hour: u16_le(bytes, 16),
        last_48_hour: u16_le(bytes, 18),
        last_96_hour: u16_le(bytes, 22),
    }
}

fn u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn u16_le(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
