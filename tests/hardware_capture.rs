//! Hardware integration tests.
//!
//! These tests require a real serial device and are ignored by default.
//! Run with: cargo test --features hardware-tests -- --ignored

#![cfg(feature = "hardware-tests")]

use serial_framegrab::config::ConfigLoader;
use serial_framegrab::{
    CancellationToken, Pipeline, Platform, PlatformScan, PortConfiguration, PortEnumerator,
    PortOpener, SerialPortOpener,
};

#[test]
#[ignore]
fn discovered_ports_reopen() {
    let opener = SerialPortOpener;
    let platform = Platform::host().expect("host platform");
    let found = PortEnumerator::new(PlatformScan::new(platform), &opener).discover();
    println!("Discovered: {:?}", found);

    for handle in &found {
        let port = opener.open(handle, PortConfiguration::default());
        assert!(port.is_ok(), "{} passed the probe but failed to reopen", handle);
    }
}

/// Captures one frame from `SERIAL_FRAMEGRAB_SERIAL_PORT` (or the first device found).
#[test]
#[ignore]
fn capture_one_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ConfigLoader::load().expect("config").into_config();
    config.output.json_path = dir.path().join("out.txt");
    config.output.image_path = dir.path().join("out.png");

    let opener = SerialPortOpener;
    let token = CancellationToken::new();
    let summary = Pipeline::new(config, &opener)
        .run(&token, &mut serial_framegrab::LogProgress::new())
        .expect("capture");

    println!("{:?}", summary);
    assert!(summary.json_path.exists());
    assert!(summary.image_path.exists());
}
