//! Byte stream to pixel grid decoding.
//!
//! The transmitter sends no header or framing: one byte per channel, cells in
//! raster order, channels R,G,B within a cell. Structure is inferred purely
//! from the byte count.

use super::cancel::CancellationToken;
use super::grid::{CaptureResult, Completion, Dimensions, PixelGrid};
use super::progress::Progress;
use crate::error::{AppError, AppResult};
use crate::port::{
    DeviceHandle, PortConfiguration, PortError, PortOpener, SerialPortAdapter,
    DEFAULT_POLL_INTERVAL,
};
use std::io;
use std::time::Duration;
use tracing::{debug, info, warn};

/// An exclusively owned serial session. Closed when dropped.
#[derive(Debug)]
pub struct Connection {
    port: Box<dyn SerialPortAdapter>,
    handle: DeviceHandle,
}

impl Connection {
    pub fn open(
        opener: &dyn PortOpener,
        handle: &DeviceHandle,
        config: PortConfiguration,
    ) -> AppResult<Self> {
        let port = opener
            .open(handle, config)
            .map_err(|source| AppError::Connection {
                device: handle.to_string(),
                source,
            })?;
        debug!(device = %handle, baud_rate = config.baud_rate, "connection opened");
        Ok(Self {
            port,
            handle: handle.clone(),
        })
    }

    pub fn handle(&self) -> &DeviceHandle {
        &self.handle
    }

    /// Block until one byte arrives or `token` is cancelled.
    ///
    /// The token is checked before every read attempt, including after each
    /// poll interval that passes without data. Returns `Ok(None)` on cancellation.
    /// A zero-length read means the stream has ended and is reported as
    /// `UnexpectedEof`.
    pub fn read_byte(&mut self, token: &CancellationToken) -> Result<Option<u8>, PortError> {
        let mut buf = [0u8; 1];
        loop {
            if token.is_cancelled() {
                return Ok(None);
            }
            match self.port.read_bytes(&mut buf) {
                Ok(0) => {
                    return Err(PortError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "serial stream ended",
                    )))
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.is_transient() => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(device = %self.handle, "connection closed");
    }
}

/// Fills a [`PixelGrid`] from a serial device, one byte per read.
pub struct StreamDecoder<'a> {
    opener: &'a dyn PortOpener,
    poll_interval: Duration,
}

impl<'a> StreamDecoder<'a> {
    pub fn new(opener: &'a dyn PortOpener) -> Self {
        Self {
            opener,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Open `handle` and decode one frame of `dims`.
    ///
    /// Cancellation through `token` yields a partial result; cells that were
    /// not reached stay zero. Any other read failure is returned as
    /// [`AppError::Read`]. The connection is closed on every path.
    pub fn decode(
        &self,
        handle: &DeviceHandle,
        baud_rate: u32,
        dims: Dimensions,
        token: &CancellationToken,
        progress: &mut dyn Progress,
    ) -> AppResult<CaptureResult> {
        let mut grid = PixelGrid::new(dims)?;
        let config = PortConfiguration {
            baud_rate,
            poll_interval: self.poll_interval,
        };
        let mut conn = Connection::open(self.opener, handle, config)?;
        info!(
            device = %handle,
            baud_rate,
            "Waiting for {}x{}x{} frame",
            dims.height,
            dims.width,
            dims.channels
        );

        let row_bytes = dims.row_bytes();
        let mut bytes_read = 0;
        for slot in grid.as_bytes_mut().iter_mut() {
            match conn.read_byte(token) {
                Ok(Some(byte)) => {
                    *slot = byte;
                    bytes_read += 1;
                    if bytes_read % row_bytes == 0 {
                        progress.row_completed(bytes_read / row_bytes, dims.height);
                    }
                }
                Ok(None) => break,
                Err(source) => {
                    return Err(AppError::Read {
                        device: conn.handle().to_string(),
                        bytes_read,
                        source,
                    })
                }
            }
        }
        drop(conn);

        let completion = if bytes_read == grid.as_bytes().len() {
            Completion::Full
        } else {
            warn!(bytes_read, "Capture interrupted, keeping partial frame");
            Completion::Partial
        };

        Ok(CaptureResult {
            grid,
            completion,
            rows_completed: bytes_read / row_bytes,
            bytes_read,
        })
    }
}
