//! Handshake token detection
//!
//! The sensor emits the ASCII token `Welcome` once at power-up, with no
//! alignment guarantee relative to read boundaries: the token may be preceded
//! by arbitrary noise and may be split across any number of polls. The
//! detector keeps a rolling window bounded to the token length and slides it
//! one byte at a time, so memory stays constant no matter how much noise
//! precedes the token.

use std::collections::VecDeque;

use crate::core::{Result, HANDSHAKE_TOKEN};
use crate::transport::ByteSource;

/// Stateful scanner that locates the handshake token in a chunked byte stream
#[derive(Debug, Default)]
pub struct HandshakeDetector {
    /// Rolling window of the most recent bytes, capped at the token length
    window: VecDeque<u8>,
    /// Set once the token has been seen; never re-entered unless reset
    complete: bool,
}

impl HandshakeDetector {
    /// Creates a new detector with an empty window
    pub fn new() -> Self {
        HandshakeDetector {
            window: VecDeque::with_capacity(HANDSHAKE_TOKEN.len()),
            complete: false,
        }
    }

    /// Returns whether the token has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Clears all state so the next scan starts from scratch
    ///
    /// Only needed if the sensor is power-cycled and will emit the token
    /// again.
    pub fn reset(&mut self) {
        self.window.clear();
        self.complete = false;
    }

    /// Consumes currently available bytes until the token is found or the
    /// source is drained
    ///
    /// Returns `true` when the token was found this call. Bytes after the
    /// token are left in the source for frame assembly. Never blocks waiting
    /// for more input; window state persists across calls so a token split
    /// between polls is still found.
    pub fn scan(&mut self, source: &mut dyn ByteSource) -> Result<bool> {
        if self.complete {
            return Ok(true);
        }
        while source.available()? > 0 {
            let byte = source.read_one()?;
            if self.push(byte) {
                self.complete = true;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Appends one byte to the window, returning `true` on a token match
    fn push(&mut self, byte: u8) -> bool {
        self.window.push_back(byte);
        if self.window.len() >= HANDSHAKE_TOKEN.len() {
            if self.window.iter().eq(HANDSHAKE_TOKEN.iter()) {
                self.window.clear();
                return true;
            }
            // Slide the window by one to bound memory and keep scanning
            self.window.pop_front();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryByteSource;

    #[test]
    fn test_token_after_noise() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        source.push_bytes(b"XXWelcome");
        assert!(detector.scan(&mut source).unwrap());
        assert!(detector.is_complete());
        assert_eq!(source.available().unwrap(), 0);
    }

    #[test]
    fn test_token_split_across_calls() {
        let token = HANDSHAKE_TOKEN;
        // Every split position must still produce exactly one detection
        for split in 1..token.len() {
            let mut detector = HandshakeDetector::new();
            let mut source = MemoryByteSource::new();

            source.push_bytes(&token[..split]);
            assert!(!detector.scan(&mut source).unwrap());

            source.push_bytes(&token[split..]);
            assert!(detector.scan(&mut source).unwrap());
            assert!(detector.is_complete());
        }
    }

    #[test]
    fn test_empty_stream_is_noop() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        assert!(!detector.scan(&mut source).unwrap());
        assert!(!detector.is_complete());
    }

    #[test]
    fn test_does_not_retrigger() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        source.push_bytes(b"Welcome");
        assert!(detector.scan(&mut source).unwrap());

        // Unrelated bytes after completion are left untouched
        source.push_bytes(b"garbage");
        assert!(detector.scan(&mut source).unwrap());
        assert_eq!(source.available().unwrap(), 7);
    }

    #[test]
    fn test_leaves_trailing_bytes_for_framing() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        source.push_bytes(b"noiseWelcome\x01\x02\x03");
        assert!(detector.scan(&mut source).unwrap());
        assert_eq!(source.available().unwrap(), 3);
        assert_eq!(source.read_one().unwrap(), 0x01);
    }

    #[test]
    fn test_reset_allows_rescan() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        source.push_bytes(b"Welcome");
        assert!(detector.scan(&mut source).unwrap());

        detector.reset();
        assert!(!detector.is_complete());
        source.push_bytes(b"Welcome");
        assert!(detector.scan(&mut source).unwrap());
    }

    #[test]
    fn test_near_miss_keeps_scanning() {
        let mut detector = HandshakeDetector::new();
        let mut source = MemoryByteSource::new();
        // "Welcomd" overlaps the token in six positions but never matches
        source.push_bytes(b"WelcomdWelcome");
        assert!(detector.scan(&mut source).unwrap());
        assert!(detector.is_complete());
    }
}
