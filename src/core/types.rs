use serde::{Deserialize, Serialize};

use super::DEFAULT_CRC_FAILURE_THRESHOLD;

/// Link status signal exposed to consumers
///
/// This is an explicit two-valued state carried across ticks, not a boolean
/// recomputed from scratch each tick. Insufficient data forces `Offline`; a
/// successful decode forces `Online`; a CRC mismatch deliberately leaves the
/// previous value in place so transient corruption does not flap the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    /// Frames are being decoded successfully
    Online,
    /// No frame has arrived yet, or the stream has dried up
    Offline,
}

/// A reading extracted from a CRC-validated frame, in raw integer form
///
/// Field widths and offsets follow the sensor's fixed frame layout. The two
/// reserved slots in the frame (bytes 10-11 and 20-21) are skipped during
/// decoding and do not surface here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReading {
    /// Running time in seconds since sensor power-up
    pub running_time: u32,
    /// Cumulative radon concentration average (Bq/m³)
    pub cumulative_radon: u32,
    /// Last 10 minutes radon concentration (Bq/m³)
    pub last_10_min: u16,
    /// Last 1 hour radon concentration (Bq/m³)
    pub last_1_hour: u16,
    /// Last 12 hours radon concentration (Bq/m³)
    pub last_12_hour: u16,
    /// Last 24 hours radon concentration (Bq/m³)
    pub last_24_hour: u16,
    /// Last 48 hours radon concentration (Bq/m³)
    pub last_48_hour: u16,
    /// Last 96 hours radon concentration (Bq/m³)
    pub last_96_hour: u16,
}

/// A reading as handed to the publish boundary, with all fields converted to
/// floating point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Running time in seconds since sensor power-up
    pub running_time: f64,
    /// Cumulative radon concentration average (Bq/m³)
    pub cumulative_radon: f64,
    /// Last 10 minutes radon concentration (Bq/m³)
    pub last_10_min: f64,
    /// Last 1 hour radon concentration (Bq/m³)
    pub last_1_hour: f64,
    /// Last 12 hours radon concentration (Bq/m³)
    pub last_12_hour: f64,
    /// Last 24 hours radon concentration (Bq/m³)
    pub last_24_hour: f64,
    /// Last 48 hours radon concentration (Bq/m³)
    pub last_48_hour: f64,
    /// Last 96 hours radon concentration (Bq/m³)
    pub last_96_hour: f64,
}

impl From<DecodedReading> for Reading {
    fn from(raw: DecodedReading) -> Self {
        Reading {
            running_time: f64::from(raw.running_time),
            cumulative_radon: f64::from(raw.cumulative_radon),
            last_10_min: f64::from(raw.last_10_min),
            last_1_hour: f64::from(raw.last_1_hour),
            last_12_hour: f64::from(raw.last_12_hour),
            last_24_hour: f64::from(raw.last_24_hour),
            last_48_hour: f64::from(raw.last_48_hour),
            last_96_hour: f64::from(raw.last_96_hour),
        }
    }
}

/// What a single poll tick produced
///
/// Every variant except a transport fault is recovered within the tick; the
/// next tick starts from a consistent stream position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Handshake token not yet seen; scanning continues next tick
    AwaitingHandshake,
    /// Handshake token found this tick with no bytes left for a frame
    HandshakeComplete,
    /// Fewer bytes available than a full frame; nothing consumed
    InsufficientData,
    /// Availability dropped between the initial check and the read;
    /// nothing consumed, stream alignment preserved
    ReadRaceAbort,
    /// A full frame arrived but its checksum did not match
    CrcMismatch,
    /// Checksum passed but the configured footer marker did not match
    FooterMismatch,
    /// A frame was validated and decoded
    Decoded(DecodedReading),
}

/// Configuration for a radon sensor instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Consecutive CRC failures tolerated before the corrective-action hook
    /// fires
    pub crc_failure_threshold: u32,
    /// Optional fixed marker expected at frame bytes 26-27, checked after
    /// CRC validation; `None` disables the check
    pub footer_marker: Option<[u8; 2]>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            crc_failure_threshold: DEFAULT_CRC_FAILURE_THRESHOLD,
            footer_marker: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_conversion_is_lossless() {
        let raw = DecodedReading {
            running_time: u32::MAX,
            cumulative_radon: 50,
            last_10_min: u16::MAX,
            last_1_hour: 1,
            last_12_hour: 2,
            last_24_hour: 3,
            last_48_hour: 4,
            last_96_hour: 5,
        };
        let reading = Reading::from(raw);
        // f64 represents every u32 exactly
        assert_eq!(reading.running_time, 4294967295.0);
        assert_eq!(reading.cumulative_radon, 50.0);
        assert_eq!(reading.last_10_min, 65535.0);
        assert_eq!(reading.last_96_hour, 5.0);
    }

    #[test]
    fn test_config_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.crc_failure_threshold, 5);
        assert!(config.footer_marker.is_none());
    }

    #[test]
    fn test_config_round_trip() {
        let config = SensorConfig {
            crc_failure_threshold: 3,
            footer_marker: Some([0x98, 0x03]),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SensorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.crc_failure_threshold, 3);
        assert_eq!(back.footer_marker, Some([0x98, 0x03]));
    }
}
