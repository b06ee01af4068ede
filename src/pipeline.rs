//! The acquisition pipeline: discover, select, decode, persist.
//!
//! Every collaborator that touches the outside world is injected, so the whole
//! sequence runs against the mock transport in tests.

use crate::capture::{CancellationToken, Completion, Progress, StreamDecoder};
use crate::config::Config;
use crate::discovery::{select, CandidateSource, Platform, PlatformScan, PortEnumerator};
use crate::error::{AppError, AppResult};
use crate::output::OutputWriter;
use crate::port::{DeviceHandle, PortOpener};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Devices that passed the probe; empty when the port was configured explicitly.
    pub discovered: Vec<DeviceHandle>,
    pub device: DeviceHandle,
    pub completion: Completion,
    pub rows_completed: usize,
    pub bytes_read: usize,
    pub json_path: PathBuf,
    pub image_path: PathBuf,
}

pub struct Pipeline<'a> {
    config: Config,
    opener: &'a dyn PortOpener,
    candidates: Option<Box<dyn CandidateSource + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: Config, opener: &'a dyn PortOpener) -> Self {
        Self {
            config,
            opener,
            candidates: None,
        }
    }

    /// Replace the platform scan with a fixed candidate source.
    pub fn with_candidates(mut self, source: impl CandidateSource + 'a) -> Self {
        self.candidates = Some(Box::new(source));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe all candidates for the configured platform.
    pub fn discover(&self) -> AppResult<Vec<DeviceHandle>> {
        let probe_config = self.config.serial.port_configuration();
        let found = match self.candidates.as_deref() {
            Some(source) => PortEnumerator::new(source, self.opener)
                .with_probe_config(probe_config)
                .discover(),
            None => {
                let platform = Platform::from_setting(&self.config.serial.platform)?;
                PortEnumerator::new(PlatformScan::new(platform), self.opener)
                    .with_probe_config(probe_config)
                    .discover()
            }
        };
        info!(count = found.len(), "Discovery finished");
        Ok(found)
    }

    /// The device to capture from, plus the discovered set it came from.
    pub fn resolve_device(&self) -> AppResult<(Vec<DeviceHandle>, DeviceHandle)> {
        if let Some(port) = &self.config.serial.port {
            let device = DeviceHandle::new(self.config.serial.resolve_port(port));
            info!(device = %device, "Using configured port, skipping discovery");
            return Ok((Vec::new(), device));
        }

        let discovered = self.discover()?;
        let device = select(&discovered)?;
        Ok((discovered, device))
    }

    /// Run the whole acquisition once: resolve the device, then [`capture`](Self::capture).
    pub fn run(
        &self,
        token: &CancellationToken,
        progress: &mut dyn Progress,
    ) -> AppResult<RunSummary> {
        self.config.validate()?;
        let (discovered, device) = self.resolve_device()?;
        self.capture(discovered, device, token, progress)
    }

    /// Decode one frame from `device` and persist it.
    ///
    /// A token cancelled before decoding starts aborts with
    /// [`AppError::Interrupted`]: no connection is opened and existing
    /// outputs are left alone. Cancelling during decoding still persists the
    /// partial frame.
    pub fn capture(
        &self,
        discovered: Vec<DeviceHandle>,
        device: DeviceHandle,
        token: &CancellationToken,
        progress: &mut dyn Progress,
    ) -> AppResult<RunSummary> {
        self.config.validate()?;
        if token.is_cancelled() {
            return Err(AppError::Interrupted);
        }

        let result = StreamDecoder::new(self.opener)
            .with_poll_interval(self.config.serial.poll_interval())
            .decode(
                &device,
                self.config.serial.baud_rate,
                self.config.capture.dimensions(),
                token,
                progress,
            )?;

        let output = &self.config.output;
        OutputWriter::new()
            .with_show(output.show)
            .persist(&result, &output.json_path, &output.image_path)?;

        Ok(RunSummary {
            discovered,
            device,
            completion: result.completion,
            rows_completed: result.rows_completed,
            bytes_read: result.bytes_read,
            json_path: output.json_path.clone(),
            image_path: output.image_path.clone(),
        })
    }
}

/// `['/dev/ttyUSB0', '/dev/ttyACM0']` style listing.
pub fn format_device_list(devices: &[DeviceHandle]) -> String {
    let items: Vec<String> = devices.iter().map(|d| format!("'{d}'")).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_device_list() {
        assert_eq!(format_device_list(&[]), "[]");
        assert_eq!(
            format_device_list(&[DeviceHandle::from("COM3"), DeviceHandle::from("COM4")]),
            "['COM3', 'COM4']"
        );
    }
}
