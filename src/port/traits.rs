//! Core traits for the serial transport seam.
//!
//! `SerialPortAdapter` is the byte source the decoder reads from and
//! `PortOpener` is the factory that produces one. Real hardware and the mock
//! transport both plug in here.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Baud rate the capture firmware transmits at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default interval after which a pending read returns so cancellation can be observed.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Platform-specific identifier of a serial endpoint (`/dev/ttyUSB0`, `COM3`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceHandle(String);

impl DeviceHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceHandle {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DeviceHandle {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Line settings for opening a device. Framing is always 8N1 without flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// How long a single read may wait before handing control back to the caller.
    pub poll_interval: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PortConfiguration {
    pub fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Default::default()
        }
    }
}

/// Trait for reading from an open serial session.
///
/// Dropping the adapter closes the underlying device.
pub trait SerialPortAdapter: Send + fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. A read that finds no data
    /// within the poll interval returns a transient [`PortError`].
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;
}

/// Factory for serial sessions, injected wherever a device has to be opened.
pub trait PortOpener: Send + Sync {
    fn open(
        &self,
        handle: &DeviceHandle,
        config: PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError>;
}
