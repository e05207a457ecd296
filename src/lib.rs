//! radonlink: streaming protocol layer for serial-connected radon sensors
//!
//! This library turns an unbounded, unaligned byte stream from a radon
//! sensor into validated structured readings. It detects the power-up
//! handshake token inside arbitrary noise, assembles fixed-size frames
//! without losing synchronization, validates them with CRC-32, decodes the
//! little-endian field layout and tracks link health under repeated
//! corruption. It is single-threaded and tick-driven: an external scheduler
//! calls [`sensor::RadonSensor::poll`] at a fixed interval.

pub mod core;
pub mod link;
pub mod protocol;
pub mod sensor;
pub mod transport;

// Re-export commonly used items
pub use self::core::{DecodedReading, Error, LinkStatus, Reading, Result, SensorConfig, TickOutcome};
pub use self::sensor::{RadonSensor, ReadingSink};
pub use self::transport::{ByteSource, MemoryByteSource, SerialByteSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
