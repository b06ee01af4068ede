//! Shared test utilities for serial-framegrab tests.
//!
//! This module provides common test infrastructure including:
//! - Mock devices pre-loaded with a frame's bytes
//! - Configurations pointing the outputs at a temp directory
//! - The reference 2x2 RGB stream

#![allow(dead_code)]

use serial_framegrab::port::MockSerialPort;
use serial_framegrab::{Config, DeviceHandle};
use std::path::Path;

/// 2x2 RGB frame, raster order.
pub const STREAM_2X2: [u8; 12] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];

/// Create a mock device that will stream `bytes`.
pub fn frame_port(port_name: &str, bytes: &[u8]) -> MockSerialPort {
    let mut mock = MockSerialPort::new(port_name);
    mock.enqueue_read(bytes);
    mock
}

/// Configuration for a small frame with outputs under `dir`.
pub fn test_config(dir: &Path, height: usize, width: usize) -> Config {
    let mut config = Config::default();
    config.capture.height = height;
    config.capture.width = width;
    config.serial.poll_interval_ms = 1;
    config.output.json_path = dir.join("out.txt");
    config.output.image_path = dir.join("out.png");
    config
}

pub fn handles(names: &[&str]) -> Vec<DeviceHandle> {
    names.iter().map(|&n| DeviceHandle::from(n)).collect()
}
