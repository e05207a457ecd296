//! Core types and constants for the radon sensor link
//!
//! This module contains the fundamental building blocks used throughout the
//! library, including the bit-exact wire-format constants.

pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{DecodedReading, LinkStatus, Reading, SensorConfig, TickOutcome};

/// Handshake token emitted once by the sensor at power-up
pub const HANDSHAKE_TOKEN: &[u8] = b"Welcome";

/// Total length of a data frame in bytes
pub const FRAME_LEN: usize = 28;

/// Number of leading frame bytes covered by the CRC
pub const CRC_PAYLOAD_LEN: usize = 24;

/// Consecutive CRC failures tolerated before corrective action is taken
pub const DEFAULT_CRC_FAILURE_THRESHOLD: u32 = 5;

/// Footer marker observed at frame bytes 26-27 on some firmware revisions
pub const DEFAULT_FOOTER_MARKER: [u8; 2] = [0x98, 0x03];
