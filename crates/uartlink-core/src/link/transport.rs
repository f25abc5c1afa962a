//! Transport abstraction over the raw byte stream
//!
//! The link manager talks to the wire through [`Transport`], so the same
//! manager drives a local serial port, a network bridge, or a test double.

use serialport::SerialPort;
use std::io::{self, Read, Write};

use super::DEFAULT_BAUD_RATE;

/// A duplex byte-stream endpoint.
pub trait Transport: Send {
    /// Write the whole buffer and wait until the bytes have physically left
    /// the device. Returns the number of bytes handed to the device.
    fn write_blocking(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Drain whatever is currently buffered without blocking. An empty
    /// vector means nothing was pending.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;
}

/// [`Transport`] implementation over a local serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    baud_rate: u32,
}

impl SerialTransport {
    /// Wrap an already-open serial port. The baud rate is used to compute
    /// transmission time on platforms where draining the port would block.
    pub fn new(port: Box<dyn SerialPort>, baud_rate: u32) -> Self {
        Self { port, baud_rate }
    }

    /// Wait for `len` bytes to clear the hardware.
    ///
    /// tcdrain can block indefinitely on some USB serial drivers, so on Unix
    /// we sleep out the transmission time at the configured baud rate
    /// instead: each byte on the wire is 10 bits (start + 8 data + stop).
    #[cfg(target_family = "unix")]
    fn drain(&mut self, len: usize) -> io::Result<()> {
        let baud = if self.baud_rate == 0 {
            tracing::warn!("baud rate is 0, assuming {}", DEFAULT_BAUD_RATE);
            DEFAULT_BAUD_RATE
        } else {
            self.baud_rate
        };

        let bits = (len as u64) * 10;
        let transmit_ms = bits * 1_000 / baud as u64;
        std::thread::sleep(std::time::Duration::from_millis(transmit_ms + 5));
        Ok(())
    }

    #[cfg(not(target_family = "unix"))]
    fn drain(&mut self, _len: usize) -> io::Result<()> {
        self.port.flush()
    }
}

impl Transport for SerialTransport {
    fn write_blocking(&mut self, data: &[u8]) -> io::Result<usize> {
        self.port.write_all(data)?;
        self.drain(data.len())?;
        Ok(data.len())
    }

    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let available = self
            .port
            .bytes_to_read()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))? as usize;
        if available == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; available];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(ref e)
                if e.kind() == io::ErrorKind::TimedOut
                    || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
