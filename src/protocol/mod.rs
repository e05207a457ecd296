//! Wire protocol: handshake detection, frame assembly, CRC validation and
//! field decoding
//!
//! The sensor speaks a simple framed protocol over its serial link: a
//! one-time ASCII handshake token at power-up, then periodic fixed-size
//! binary frames carrying little-endian readings with a CRC-32 trailer.

pub mod crc;
pub mod frame;
pub mod handshake;

pub use self::crc::crc32;
pub use self::frame::{assemble_frame, decode_frame, Assembly, RawFrame};
pub use self::handshake::HandshakeDetector;
