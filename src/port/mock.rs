//! Mock serial transport for testing.
//!
//! Provides a `MockSerialPort` that simulates a device streaming bytes without
//! requiring actual hardware, and a `MockOpener` that hands out sessions on a
//! fixed set of mock devices while counting opens and closes.

use super::error::PortError;
use super::traits::{DeviceHandle, PortConfiguration, PortOpener, SerialPortAdapter};
use crate::capture::CancellationToken;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Inner state of the mock port, shared by every clone and session.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Number of `read_bytes` calls that returned data.
    read_calls: usize,
    /// Number of bytes handed out so far.
    bytes_served: usize,
    /// Trip the token once this many bytes have been served.
    cancel_after: Option<(usize, CancellationToken)>,
    /// Fail with a broken pipe instead of would-block once the queue is empty.
    hang_up_when_drained: bool,
    /// Report end of stream (`Ok(0)`) once the queue is empty.
    eof_when_drained: bool,
    /// Sessions opened through a `MockOpener`.
    opens: usize,
    /// Sessions dropped again.
    closes: usize,
    /// Baud rate requested by the most recent open.
    last_baud: Option<u32>,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use serial_framegrab::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(&[10, 20, 30]);
///
/// let mut buffer = [0u8; 1];
/// assert_eq!(port.read_bytes(&mut buffer).unwrap(), 1);
/// assert_eq!(buffer[0], 10);
/// assert_eq!(port.available_bytes(), 2);
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&mut self, data: &[u8]) {
        self.state.lock().read_queue.extend(data);
    }

    /// Cancel `token` as soon as `count` bytes have been read from this port.
    ///
    /// Stands in for an operator interrupt arriving mid-stream.
    pub fn cancel_after(&mut self, count: usize, token: CancellationToken) {
        let mut state = self.state.lock();
        if count == 0 {
            token.cancel();
        }
        state.cancel_after = Some((count, token));
    }

    /// Simulate the device disappearing once the queued bytes run out.
    pub fn hang_up_when_drained(&mut self, hang_up: bool) {
        self.state.lock().hang_up_when_drained = hang_up;
    }

    /// Simulate a stream that ends once the queued bytes run out.
    pub fn eof_when_drained(&mut self, eof: bool) {
        self.state.lock().eof_when_drained = eof;
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state.lock().read_queue.len()
    }

    /// Number of read calls that returned data.
    pub fn read_calls(&self) -> usize {
        self.state.lock().read_calls
    }

    /// Total bytes handed out so far.
    pub fn bytes_served(&self) -> usize {
        self.state.lock().bytes_served
    }

    /// Sessions opened on this port through a [`MockOpener`].
    pub fn open_count(&self) -> usize {
        self.state.lock().opens
    }

    /// Sessions closed again.
    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    /// Baud rate requested by the most recent open, if any.
    pub fn last_baud(&self) -> Option<u32> {
        self.state.lock().last_baud
    }

    fn read_shared(&self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock();

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && state.eof_when_drained {
            return Ok(0);
        }
        if bytes_read == 0 {
            let kind = if state.hang_up_when_drained {
                std::io::ErrorKind::BrokenPipe
            } else {
                std::io::ErrorKind::WouldBlock
            };
            return Err(PortError::Io(std::io::Error::new(kind, "No data available")));
        }

        state.read_calls += 1;
        state.bytes_served += bytes_read;
        let served = state.bytes_served;
        if let Some((threshold, token)) = &state.cancel_after {
            if served >= *threshold {
                token.cancel();
            }
        }
        Ok(bytes_read)
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.read_shared(buffer)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("available_bytes", &self.available_bytes())
            .finish()
    }
}

/// An open session on a mock port; counts as closed when dropped.
#[derive(Debug)]
struct MockSession {
    port: MockSerialPort,
}

impl SerialPortAdapter for MockSession {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read_shared(buffer)
    }

    fn name(&self) -> &str {
        self.port.name()
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.port.state.lock().closes += 1;
    }
}

/// `PortOpener` over a fixed set of mock devices.
///
/// Handles that were never registered fail to open with [`PortError::NotFound`].
#[derive(Debug, Default)]
pub struct MockOpener {
    ports: HashMap<DeviceHandle, MockSerialPort>,
    attempts: Mutex<Vec<DeviceHandle>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device that opens successfully.
    pub fn with_port(mut self, port: MockSerialPort) -> Self {
        self.ports.insert(DeviceHandle::new(port.name()), port);
        self
    }

    /// Every handle an open was attempted on, in order.
    pub fn attempts(&self) -> Vec<DeviceHandle> {
        self.attempts.lock().clone()
    }
}

impl PortOpener for MockOpener {
    fn open(
        &self,
        handle: &DeviceHandle,
        config: PortConfiguration,
    ) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        self.attempts.lock().push(handle.clone());

        let port = self
            .ports
            .get(handle)
            .cloned()
            .ok_or_else(|| PortError::not_found(handle.as_str()))?;
        {
            let mut state = port.state.lock();
            state.opens += 1;
            state.last_baud = Some(config.baud_rate);
        }
        Ok(Box::new(MockSession { port }))
    }
}
