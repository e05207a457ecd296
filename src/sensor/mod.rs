//! Sensor polling cycle
//!
//! [`RadonSensor`] owns all per-instance protocol state and executes one
//! bounded unit of work per [`poll`](RadonSensor::poll): handshake scanning
//! until the power-up token has been seen, then frame assembly, CRC
//! validation, decoding and link-health bookkeeping. It is driven by an
//! external periodic scheduler and never blocks; every poll runs to
//! completion and returns.

use tracing::{error, info, warn};

use crate::core::{Reading, Result, SensorConfig, TickOutcome};
use crate::link::{CorrectiveAction, LinkHealth};
use crate::protocol::frame::{assemble_frame, decode_frame, Assembly, RawFrame};
use crate::protocol::{crc32, HandshakeDetector};
use crate::transport::ByteSource;

/// Publish capability for decoded readings and the per-tick link signal
///
/// Injected at construction; absence means decoded values are dropped after
/// health bookkeeping, never an error.
pub trait ReadingSink {
    /// Called once per successfully decoded frame
    fn publish_reading(&mut self, reading: &Reading);

    /// Called once per tick with the current online/offline signal
    fn publish_link_status(&mut self, online: bool);
}

/// A radon sensor instance bound to one exclusive byte source
pub struct RadonSensor {
    /// Configuration fixed at construction
    config: SensorConfig,
    /// Exclusively owned byte stream from the sensor
    source: Box<dyn ByteSource>,
    /// Optional downstream publisher
    sink: Option<Box<dyn ReadingSink>>,
    /// Power-up token scanner; terminal once complete
    handshake: HandshakeDetector,
    /// CRC failure tracking and the online/offline signal
    health: LinkHealth,
}

impl RadonSensor {
    /// Creates a sensor instance over the given byte source
    pub fn new(source: Box<dyn ByteSource>, config: SensorConfig) -> Self {
        let health = LinkHealth::new(config.crc_failure_threshold);
        RadonSensor {
            config,
            source,
            sink: None,
            handshake: HandshakeDetector::new(),
            health,
        }
    }

    /// Attaches a publish sink for readings and link status
    pub fn with_sink(mut self, sink: Box<dyn ReadingSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Installs the corrective-action hook fired on the CRC failure
    /// threshold crossing
    pub fn with_corrective_action(mut self, hook: CorrectiveAction) -> Self {
        self.health.set_corrective_action(hook);
        self
    }

    /// Returns the link health state
    pub fn health(&self) -> &LinkHealth {
        &self.health
    }

    /// Returns whether the handshake token has been seen
    pub fn handshake_complete(&self) -> bool {
        self.handshake.is_complete()
    }

    /// Restarts handshake scanning, for callers that power-cycle the sensor
    pub fn reset_handshake(&mut self) {
        self.handshake.reset();
    }

    /// Executes one polling tick
    ///
    /// Runs synchronously to completion. All recoverable conditions are
    /// reported in the returned [`TickOutcome`]; an `Err` means the transport
    /// itself failed. The link status is published to the sink once per tick
    /// regardless of outcome.
    pub fn poll(&mut self) -> Result<TickOutcome> {
        let outcome = self.run_tick()?;
        let online = self.health.is_online();
        if let Some(sink) = self.sink.as_mut() {
            sink.publish_link_status(online);
        }
        Ok(outcome)
    }

    fn run_tick(&mut self) -> Result<TickOutcome> {
        if !self.handshake.is_complete() {
            if !self.handshake.scan(self.source.as_mut())? {
                return Ok(TickOutcome::AwaitingHandshake);
            }
            info!("received handshake token");
            if self.source.available()? == 0 {
                return Ok(TickOutcome::HandshakeComplete);
            }
            // Bytes follow the token; attempt a frame in the same tick
        }

        match assemble_frame(self.source.as_mut())? {
            Assembly::Insufficient => {
                self.health.record_no_frame();
                Ok(TickOutcome::InsufficientData)
            }
            Assembly::Aborted => Ok(TickOutcome::ReadRaceAbort),
            Assembly::Complete(frame) => Ok(self.process_frame(&frame)),
        }
    }

    fn process_frame(&mut self, frame: &RawFrame) -> TickOutcome {
        let calculated = crc32(frame.payload());
        let received = frame.received_crc();
        if received != calculated {
            error!(
                "CRC mismatch: received {:#010x}, calculated {:#010x}",
                received, calculated
            );
            self.health.record_crc_failure();
            return TickOutcome::CrcMismatch;
        }

        // Integrity is established at this point, so the link counts as
        // healthy even if the secondary footer check rejects the content
        self.health.record_success();

        if let Some(marker) = self.config.footer_marker {
            let footer = frame.footer();
            if footer != marker {
                warn!(
                    "unexpected frame footer: [{:02X} {:02X}]",
                    footer[0], footer[1]
                );
                return TickOutcome::FooterMismatch;
            }
        }

        let decoded = decode_frame(frame);
        info!(
            running_time = decoded.running_time,
            cumulative_radon = decoded.cumulative_radon,
            last_10_min = decoded.last_10_min,
            last_1_hour = decoded.last_1_hour,
            last_12_hour = decoded.last_12_hour,
            last_24_hour = decoded.last_24_hour,
            last_48_hour = decoded.last_48_hour,
            last_96_hour = decoded.last_96_hour,
            "decoded reading"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.publish_reading(&Reading::from(decoded));
        }
        TickOutcome::Decoded(decoded)
    }
}
