//! Serial device discovery and selection.
//!
//! Candidates come from a [`CandidateSource`] (normally a [`PlatformScan`]);
//! each one is probed with an open/close round trip through the injected
//! [`PortOpener`] and only the ones that pass are reported.

mod platform;
mod selector;

pub use platform::{Platform, PlatformScan};
pub use selector::select;

use crate::port::{DeviceHandle, PortConfiguration, PortOpener};
use tracing::debug;

/// Produces the device names worth probing.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self) -> Vec<DeviceHandle>;
}

impl<T: CandidateSource + ?Sized> CandidateSource for &T {
    fn candidates(&self) -> Vec<DeviceHandle> {
        (**self).candidates()
    }
}

impl CandidateSource for Vec<DeviceHandle> {
    fn candidates(&self) -> Vec<DeviceHandle> {
        self.clone()
    }
}

/// Finds the serial devices that can actually be opened.
pub struct PortEnumerator<'a> {
    source: Box<dyn CandidateSource + 'a>,
    opener: &'a dyn PortOpener,
    probe_config: PortConfiguration,
}

impl<'a> PortEnumerator<'a> {
    pub fn new(source: impl CandidateSource + 'a, opener: &'a dyn PortOpener) -> Self {
        Self {
            source: Box::new(source),
            opener,
            probe_config: PortConfiguration::default(),
        }
    }

    /// Line settings used for the probe open.
    pub fn with_probe_config(mut self, config: PortConfiguration) -> Self {
        self.probe_config = config;
        self
    }

    /// Probe every candidate and keep, in enumeration order, those that open.
    pub fn discover(&self) -> Vec<DeviceHandle> {
        self.source
            .candidates()
            .into_iter()
            .filter(|handle| self.probe(handle))
            .collect()
    }

    fn probe(&self, handle: &DeviceHandle) -> bool {
        match self.opener.open(handle, self.probe_config) {
            Ok(port) => {
                drop(port);
                debug!(device = %handle, "probe ok");
                true
            }
            Err(e) => {
                debug!(device = %handle, "probe failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{MockOpener, MockSerialPort};
    use pretty_assertions::assert_eq;

    fn handles(names: &[&str]) -> Vec<DeviceHandle> {
        names.iter().map(|&n| DeviceHandle::from(n)).collect()
    }

    #[test]
    fn test_discover_keeps_only_openable_in_order() {
        let usb1 = MockSerialPort::new("/dev/ttyUSB1");
        let acm0 = MockSerialPort::new("/dev/ttyACM0");
        let opener = MockOpener::new().with_port(usb1.clone()).with_port(acm0.clone());
        let candidates = handles(&["/dev/ttyS0", "/dev/ttyUSB1", "/dev/ttyS1", "/dev/ttyACM0"]);

        let found = PortEnumerator::new(candidates.clone(), &opener).discover();

        assert_eq!(found, handles(&["/dev/ttyUSB1", "/dev/ttyACM0"]));
        assert_eq!(opener.attempts(), candidates);
        assert_eq!(usb1.open_count(), usb1.close_count());
        assert_eq!(acm0.close_count(), 1);
    }

    #[test]
    fn test_discover_nothing_openable() {
        let opener = MockOpener::new();
        let found = PortEnumerator::new(handles(&["COM1", "COM2"]), &opener).discover();
        assert!(found.is_empty());
    }

    #[test]
    fn test_probe_uses_configured_baud() {
        let port = MockSerialPort::new("COM4");
        let opener = MockOpener::new().with_port(port.clone());

        PortEnumerator::new(handles(&["COM4"]), &opener)
            .with_probe_config(PortConfiguration::with_baud_rate(9600))
            .discover();

        assert_eq!(port.last_baud(), Some(9600));
    }
}
