//! Byte-stream transport capability
//!
//! The protocol core never touches a serial port directly: it consumes the
//! [`ByteSource`] capability, which any scheduler-driven host can implement.
//! Two implementations ship with the crate: [`SerialByteSource`] wrapping a
//! real serial port, and [`MemoryByteSource`] for tests and offline replay.

use std::io::Read;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use serialport::SerialPort;

use crate::core::{Error, Result};

/// Non-blocking byte-stream capability consumed by the protocol core
///
/// Both methods return immediately with whatever is buffered. `read_one` on
/// an empty source is a transport error; callers gate reads on `available`.
pub trait ByteSource {
    /// Number of bytes readable right now without blocking
    fn available(&mut self) -> Result<usize>;

    /// Reads and consumes the next byte
    fn read_one(&mut self) -> Result<u8>;
}

/// In-memory byte source backed by a growable buffer
///
/// Useful for tests and for replaying captured sensor streams.
#[derive(Debug, Default)]
pub struct MemoryByteSource {
    buf: BytesMut,
}

impl MemoryByteSource {
    /// Creates an empty source
    pub fn new() -> Self {
        MemoryByteSource {
            buf: BytesMut::new(),
        }
    }

    /// Appends bytes to the stream
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}

impl ByteSource for MemoryByteSource {
    fn available(&mut self) -> Result<usize> {
        Ok(self.buf.len())
    }

    fn read_one(&mut self) -> Result<u8> {
        if self.buf.is_empty() {
            return Err(Error::transport("read past end of buffered stream"));
        }
        Ok(self.buf.get_u8())
    }
}

/// Byte source backed by a serial port
///
/// Pending bytes are drained from the port into a read-ahead buffer on each
/// `available` call, so `read_one` never blocks on the device.
pub struct SerialByteSource {
    /// Serial port for sensor data
    port: Box<dyn SerialPort>,
    /// Read-ahead buffer holding bytes already drained from the port
    buf: BytesMut,
}

impl SerialByteSource {
    /// Opens the serial device at the given path and baud rate
    pub fn open(device_path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(device_path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|e| Error::transport(format!("failed to open sensor device: {}", e)))?;
        Ok(SerialByteSource {
            port,
            buf: BytesMut::new(),
        })
    }

    /// Moves all bytes pending on the port into the read-ahead buffer
    fn fill(&mut self) -> Result<()> {
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|e| Error::transport(format!("failed to query serial buffer: {}", e)))?
            as usize;
        fill_from(&mut self.port, &mut self.buf, pending)
    }
}

/// Appends exactly `pending` bytes from `reader` to `buf`, leaving `buf`
/// untouched if the read fails
///
/// The buffer is grown before the read and must be rolled back on failure:
/// `read_exact` leaves the destination contents unspecified on error, and a
/// caller retrying after the error would otherwise consume bytes that were
/// never on the wire, desynchronizing framing.
fn fill_from(reader: &mut dyn Read, buf: &mut BytesMut, pending: usize) -> Result<()> {
    if pending == 0 {
        return Ok(());
    }
    let start = buf.len();
    buf.resize(start + pending, 0);
    if let Err(e) = reader.read_exact(&mut buf[start..]) {
        buf.truncate(start);
        return Err(e.into());
    }
    Ok(())
}

impl ByteSource for SerialByteSource {
    fn available(&mut self) -> Result<usize> {
        self.fill()?;
        Ok(self.buf.len())
    }

    fn read_one(&mut self) -> Result<u8> {
        if self.buf.is_empty() {
            self.fill()?;
        }
        if self.buf.is_empty() {
            return Err(Error::transport("read past end of serial buffer"));
        }
        Ok(self.buf.get_u8())
    }
}

/// Test double whose availability reports follow a script, independent of
/// the bytes actually buffered
///
/// Used to exercise the assembler's defense against a source whose first
/// availability report turns out to be stale.
#[cfg(test)]
#[derive(Debug)]
pub struct ScriptedByteSource {
    reports: std::collections::VecDeque<usize>,
    data: std::collections::VecDeque<u8>,
    reads: usize,
}

#[cfg(test)]
impl ScriptedByteSource {
    /// Creates a source returning the given availability reports in order
    pub fn new(reports: Vec<usize>) -> Self {
        ScriptedByteSource {
            reports: reports.into(),
            data: std::collections::VecDeque::new(),
            reads: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn bytes_read(&self) -> usize {
        self.reads
    }
}

#[cfg(test)]
impl ByteSource for ScriptedByteSource {
    fn available(&mut self) -> Result<usize> {
        Ok(self.reports.pop_front().unwrap_or(self.data.len()))
    }

    fn read_one(&mut self) -> Result<u8> {
        self.reads += 1;
        self.data
            .pop_front()
            .ok_or_else(|| Error::transport("scripted source exhausted"))
    }
}
