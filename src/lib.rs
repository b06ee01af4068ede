//! Serial Framegrab Library
//!
//! Acquires a fixed-size raster image that a device streams over a serial link
//! with no framing, one byte per channel in raster order, and saves it as a
//! nested JSON dump and a PNG.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `error`: Unified error handling
//! - `port`: Port abstraction layer for serial communication
//! - `discovery`: Platform device enumeration, liveness probing and selection
//! - `capture`: Pixel grid, stream decoder and cancellation
//! - `output`: JSON dump and PNG persistence
//! - `pipeline`: The end-to-end acquisition sequence
//! - `logging`: Tracing subscriber setup

pub mod capture;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod port;

// Re-export commonly used types for convenience
pub use capture::{
    CancellationToken, CaptureResult, Completion, Dimensions, LogProgress, NoProgress, PixelGrid,
    Progress, StreamDecoder,
};
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use discovery::{select, CandidateSource, Platform, PlatformScan, PortEnumerator};
pub use error::{AppError, AppResult};
pub use output::{load_dump, OutputWriter};
pub use pipeline::{Pipeline, RunSummary};
pub use port::{
    DeviceHandle, MockOpener, MockSerialPort, PortConfiguration, PortError, PortOpener,
    SerialPortAdapter, SerialPortOpener, SyncSerialPort,
};
